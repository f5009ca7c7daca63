//! Fixed placement table for the intake form.
//!
//! The layout is data, not drawing code: every field of the form is one
//! entry here, and the renderer just walks the table. Coordinates are in
//! PDF points with the origin at the lower-left corner of a US Letter
//! page, matching the one known form this tool targets.

/// US Letter, in points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

/// Font size used where a slot does not override it.
pub const BASE_FONT_SIZE: f32 = 10.0;

/// Word-wrap rules for multi-line slots.
///
/// `measure_size` is the font size used when measuring line widths; it
/// can differ from the size the text is drawn at (the insurance block
/// wraps as if set at 8pt but is drawn at 6.5pt, which is how the form
/// was originally tuned).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wrap {
    pub measure_size: f32,
    pub width: f32,
    pub max_lines: usize,
    pub line_step: f32,
}

/// The single-line or wrapped text slots of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    ApptTime,
    PatientName,
    Dob,
    Cc,
    PrimaryIns,
    SecSupIns,
    BriefHistory,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSlot {
    pub field: Field,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    /// Hard character cap applied before drawing, if any.
    pub max_chars: Option<usize>,
    pub wrap: Option<Wrap>,
}

pub const FIELD_SLOTS: [FieldSlot; 8] = [
    FieldSlot {
        field: Field::Date,
        x: 175.0,
        y: 730.0,
        font_size: 10.0,
        max_chars: None,
        wrap: None,
    },
    FieldSlot {
        field: Field::ApptTime,
        x: 309.0,
        y: 730.0,
        font_size: 6.5,
        max_chars: Some(40),
        wrap: None,
    },
    FieldSlot {
        field: Field::PatientName,
        x: 450.0,
        y: 730.0,
        font_size: 10.0,
        max_chars: None,
        wrap: None,
    },
    FieldSlot {
        field: Field::Dob,
        x: 370.0,
        y: 670.0,
        font_size: 10.0,
        max_chars: None,
        wrap: None,
    },
    FieldSlot {
        field: Field::Cc,
        x: 130.0,
        y: 620.0,
        font_size: 10.0,
        max_chars: Some(50),
        wrap: None,
    },
    FieldSlot {
        field: Field::PrimaryIns,
        x: 73.0,
        y: 680.0,
        font_size: 6.5,
        max_chars: None,
        wrap: Some(Wrap {
            measure_size: 8.0,
            width: 150.0,
            max_lines: 2,
            line_step: -13.0,
        }),
    },
    FieldSlot {
        field: Field::SecSupIns,
        x: 80.0,
        y: 650.0,
        font_size: 6.5,
        max_chars: None,
        wrap: None,
    },
    FieldSlot {
        field: Field::BriefHistory,
        x: 75.0,
        y: 570.0,
        font_size: 9.0,
        max_chars: None,
        wrap: Some(Wrap {
            measure_size: 9.0,
            width: 450.0,
            max_lines: 5,
            line_step: -13.0,
        }),
    },
];

/// Medication list block: up to four entries, one line each.
pub const MEDICATION_X: f32 = 60.0;
pub const MEDICATION_Y: f32 = 500.0;
pub const MEDICATION_LINE_STEP: f32 = -15.0;
pub const MAX_MEDICATION_ENTRIES: usize = 4;
pub const MEDICATION_MAX_CHARS: usize = 90;
