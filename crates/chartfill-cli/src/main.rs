mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chartfill",
    version,
    about = "Batch-fill patient intake PDF forms from appointment spreadsheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a data file and print the sorted records (without rendering)
    Extract {
        /// Path to CSV/XLS/XLSX appointment data
        data_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Fill one form per record and bundle the results into a ZIP archive
    Fill {
        /// Path to CSV/XLS/XLSX appointment data
        data_file: PathBuf,

        /// Path to the blank PDF form template
        template: PathBuf,

        /// Where to write the archive
        #[arg(short, long, default_value = "filled_forms.zip")]
        out: PathBuf,

        /// Also keep the per-record PDFs in this directory
        #[arg(long, value_name = "DIR")]
        keep_output: Option<PathBuf>,
    },
    /// Serve the upload form over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 10000)]
        port: u16,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { data_file, output } => commands::extract::run(data_file, &output),
        Commands::Fill {
            data_file,
            template,
            out,
            keep_output,
        } => commands::fill::run(data_file, template, out, keep_output),
        Commands::Serve { port } => commands::serve::run(port),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
