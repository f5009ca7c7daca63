//! Transparent text layer for one record.
//!
//! The renderer walks the layout table and emits a page of raw PDF text
//! operators, positioned to line up with the pre-printed form when the
//! merger stamps it onto the template. Only Helvetica is used, so line
//! measurement works from the standard AFM advance widths instead of an
//! embedded font file.

use crate::layout::{
    Field, BASE_FONT_SIZE, FIELD_SLOTS, MAX_MEDICATION_ENTRIES, MEDICATION_LINE_STEP,
    MEDICATION_MAX_CHARS, MEDICATION_X, MEDICATION_Y,
};
use crate::model::Record;

/// Resource name the merger registers for the overlay font. Deliberately
/// unusual so it cannot collide with a name the template already uses.
pub const OVERLAY_FONT_NAME: &str = "ChfHelv";

/// Rendered overlay: one content stream per page. Currently always a
/// single page, so only the first page of a multi-page template is
/// stamped.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub pages: Vec<Vec<u8>>,
}

/// Render the overlay for one record.
///
/// Empty fields are simply not drawn. Wrapped fields are cut at their
/// line cap, character-capped fields at their character cap; excess is
/// dropped silently.
pub fn render_overlay(record: &Record) -> Overlay {
    let mut page = Vec::new();

    for slot in FIELD_SLOTS {
        let value = field_value(record, slot.field);
        if value.is_empty() {
            continue;
        }
        match slot.wrap {
            Some(wrap) => {
                let lines = wrap_to_width(value, wrap.measure_size, wrap.width);
                for (i, line) in lines.iter().take(wrap.max_lines).enumerate() {
                    let y = slot.y + wrap.line_step * i as f32;
                    draw_text(&mut page, slot.x, y, slot.font_size, line);
                }
            }
            None => {
                let text = match slot.max_chars {
                    Some(limit) => truncate_chars(value, limit),
                    None => value.to_string(),
                };
                draw_text(&mut page, slot.x, slot.y, slot.font_size, &text);
            }
        }
    }

    for (i, med) in record
        .medications
        .iter()
        .take(MAX_MEDICATION_ENTRIES)
        .enumerate()
    {
        let line = truncate_chars(&med.form_line(), MEDICATION_MAX_CHARS);
        let y = MEDICATION_Y + MEDICATION_LINE_STEP * i as f32;
        draw_text(&mut page, MEDICATION_X, y, BASE_FONT_SIZE, &line);
    }

    Overlay { pages: vec![page] }
}

fn field_value(record: &Record, field: Field) -> &str {
    match field {
        Field::Date => record.date.as_str(),
        Field::ApptTime => record.appt_time.raw(),
        Field::PatientName => &record.patient_name,
        Field::Dob => record.dob.as_str(),
        Field::Cc => &record.cc,
        Field::PrimaryIns => &record.primary_ins,
        Field::SecSupIns => &record.sec_sup_ins,
        Field::BriefHistory => &record.brief_history,
    }
}

/// Greedy word wrap against measured widths.
///
/// Breaks on whitespace only; a single word wider than the limit still
/// occupies a line of its own rather than being split mid-word.
pub fn wrap_to_width(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if current.is_empty() || text_width(&candidate, font_size) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Width of a string in points when set in Helvetica at `font_size`.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c))).sum();
    units as f32 * font_size / 1000.0
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn draw_text(page: &mut Vec<u8>, x: f32, y: f32, font_size: f32, text: &str) {
    page.extend_from_slice(
        format!("BT /{OVERLAY_FONT_NAME} {font_size} Tf {x} {y} Td (").as_bytes(),
    );
    for c in text.chars() {
        let code = u32::from(c);
        match c {
            '\\' => page.extend_from_slice(b"\\\\"),
            '(' => page.extend_from_slice(b"\\("),
            ')' => page.extend_from_slice(b"\\)"),
            '\n' | '\r' => page.push(b' '),
            _ if code < 0x20 => page.push(b' '),
            // Latin-1 maps straight onto WinAnsi for the range we see.
            _ if code < 0x100 => page.push(code as u8),
            _ => page.push(b'?'),
        }
    }
    page.extend_from_slice(b") Tj ET\n");
}

/// Helvetica AFM advance widths, glyph units per 1000, for ASCII
/// 0x20..=0x7E. Characters outside the table use a common fallback.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const FALLBACK_WIDTH: u16 = 556;

fn glyph_width(c: char) -> u16 {
    let code = u32::from(c);
    if (0x20..=0x7E).contains(&code) {
        HELVETICA_WIDTHS[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApptTime, DateText, MedicationEntry};

    fn empty_record() -> Record {
        Record {
            date: DateText::Unparsed(String::new()),
            appt_time: ApptTime::Unparsed(String::new()),
            patient_name: String::new(),
            dob: DateText::Unparsed(String::new()),
            cc: String::new(),
            primary_ins: String::new(),
            sec_sup_ins: String::new(),
            brief_history: String::new(),
            medications: Vec::new(),
        }
    }

    #[test]
    fn known_widths_measure_correctly() {
        // 'i' is 222/1000 em wide in Helvetica.
        assert!((text_width("i", 10.0) - 2.22).abs() < 1e-4);
        // Wider string measures wider.
        assert!(text_width("WWW", 9.0) > text_width("iii", 9.0));
    }

    #[test]
    fn wrap_breaks_on_whitespace_only() {
        let lines = wrap_to_width("alpha beta gamma delta", 9.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 9.0) <= 60.0 || !line.contains(' '));
            assert!(!line.starts_with(' ') && !line.ends_with(' '));
        }
        // Reassembling the lines reproduces the words in order.
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, "alpha beta gamma delta");
    }

    #[test]
    fn overwide_single_word_gets_its_own_line() {
        let lines = wrap_to_width("supercalifragilistic ok", 10.0, 30.0);
        assert_eq!(lines[0], "supercalifragilistic");
        assert_eq!(lines[1], "ok");
    }

    #[test]
    fn empty_record_renders_no_text() {
        let overlay = render_overlay(&empty_record());
        assert_eq!(overlay.pages.len(), 1);
        assert!(overlay.pages[0].is_empty());
    }

    #[test]
    fn fields_are_placed_at_their_slots() {
        let mut record = empty_record();
        record.patient_name = "Jane Doe".into();
        record.cc = "Cough".into();
        let overlay = render_overlay(&record);
        let ops = String::from_utf8(overlay.pages[0].clone()).unwrap();
        assert!(ops.contains("450 730 Td (Jane Doe) Tj"));
        assert!(ops.contains("130 620 Td (Cough) Tj"));
    }

    #[test]
    fn appt_time_is_capped_at_forty_chars() {
        let mut record = empty_record();
        record.appt_time = ApptTime::Unparsed("x".repeat(60));
        let overlay = render_overlay(&record);
        let ops = String::from_utf8(overlay.pages[0].clone()).unwrap();
        assert!(ops.contains(&format!("({})", "x".repeat(40))));
        assert!(!ops.contains(&"x".repeat(41)));
    }

    #[test]
    fn history_wraps_to_at_most_five_lines() {
        let mut record = empty_record();
        record.brief_history = "word ".repeat(400).trim_end().to_string();
        let overlay = render_overlay(&record);
        let ops = String::from_utf8(overlay.pages[0].clone()).unwrap();
        let drawn = ops.matches("Tj ET").count();
        assert_eq!(drawn, 5);
        // Lines step down by 13pt from the anchor.
        assert!(ops.contains("75 570 Td"));
        assert!(ops.contains("75 518 Td"));
    }

    #[test]
    fn at_most_four_medications_drawn_and_truncated() {
        let mut record = empty_record();
        for i in 0..6 {
            record.medications.push(MedicationEntry {
                date: "01.02.2024".into(),
                name: format!("Med{i}{}", "x".repeat(120)),
                qty: "30".into(),
                refill: "1".into(),
            });
        }
        let overlay = render_overlay(&record);
        let ops = String::from_utf8(overlay.pages[0].clone()).unwrap();
        assert_eq!(ops.matches("Tj ET").count(), 4);
        assert!(ops.contains("60 500 Td"));
        assert!(ops.contains("60 455 Td"));
        // Every medication line is cut at 90 characters.
        for line in ops.lines() {
            if let Some(start) = line.find('(') {
                let end = line.rfind(')').unwrap();
                assert!(line[start + 1..end].chars().count() <= 90);
            }
        }
    }

    #[test]
    fn parentheses_and_backslashes_are_escaped() {
        let mut record = empty_record();
        record.cc = "pain (left) \\ numbness".into();
        let overlay = render_overlay(&record);
        let ops = String::from_utf8(overlay.pages[0].clone()).unwrap();
        assert!(ops.contains("(pain \\(left\\) \\\\ numbness)"));
    }
}
