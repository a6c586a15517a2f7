use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use report_generation::{ReportConfig, ReportPipeline};

/// Generates `Generated_Report.pdf` in the working directory from a tab-delimited data file.
///
/// Fonts are looked up under `assets/fonts` next to the executable or in the directory named
/// by `REPORT_FONTS_DIR`, falling back to the system's Arial or Liberation Sans fonts.
#[derive(Parser)]
#[command(author, version, about = "Automated PDF report generation from tab-delimited data")]
struct Cli {
    /// Tab-delimited input file with a header row.
    #[arg(env = "REPORT_DATA_FILE", default_value = report_generation::config::DEFAULT_INPUT_FILE)]
    input: PathBuf,
}

fn main() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("REPORT_LOG", "error"))
        .init();

    let cli = Cli::parse();
    let config = ReportConfig::new(cli.input);
    let output_path = config.output_path().to_path_buf();

    let result = ReportPipeline::new(config)
        .on_validated(|dataset, rows| {
            println!("Data loaded successfully:");
            println!("{}", dataset.preview(rows));
        })
        .run();

    match result {
        Ok(_) => println!(
            "Report generated successfully and saved as '{}'.",
            output_path.display()
        ),
        Err(err) => {
            println!("Error: {}", err);
            std::process::exit(1);
        }
    }
}
