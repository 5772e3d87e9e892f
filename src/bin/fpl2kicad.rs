use clap::Parser;
use fpl2kicad::config::{ConvertConfig, LibraryJob};
use fpl2kicad::run_jobs;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert directories of FPL footprints into legacy KiCad `.mod` libraries.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file listing the libraries to convert.
    #[arg(short, long, conflicts_with_all = ["input", "output", "select", "strict"])]
    config: Option<PathBuf>,

    /// Directory holding the `.fpl` files.
    #[arg(required_unless_present = "config")]
    input: Option<PathBuf>,

    /// The `.mod` file to write.
    #[arg(required_unless_present = "config")]
    output: Option<PathBuf>,

    /// Only write footprints whose name matches this regex.
    #[arg(short, long)]
    select: Option<String>,

    /// Fail on any parse diagnostic.
    #[arg(long)]
    strict: bool,

    /// Log per-file and per-footprint progress.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> fpl2kicad::error::Result<ConvertConfig> {
        if let Some(path) = &self.config {
            return ConvertConfig::from_file(path);
        }
        let (Some(input), Some(output)) = (self.input, self.output) else {
            return Err(fpl2kicad::error::Error::MissingData(
                "input directory and output file are required".to_string(),
            ));
        };
        let config = ConvertConfig {
            libraries: vec![LibraryJob {
                input,
                output,
                select: self.select,
                strict: self.strict,
            }],
        };
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run_jobs(&config) {
        Ok(all_stats) => {
            for (job, stats) in config.libraries.iter().zip(&all_stats) {
                info!(
                    "{} -> {}: {} files, {} of {} footprints written, {} diagnostics",
                    job.input.display(),
                    job.output.display(),
                    stats.files_read,
                    stats.footprints_written,
                    stats.footprints_read,
                    stats.diagnostics
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Conversion failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
