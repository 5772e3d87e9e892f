// src/lib.rs

pub mod config;
pub mod converter;
pub mod cursor;
pub mod error;
pub mod file_writer;
pub mod fpl_models;
pub mod importer;
pub mod kicad_models;

use crate::config::{ConvertConfig, LibraryJob};
use crate::error::Result;
use crate::fpl_models::Library;
use log::info;

/// Outcome of one converted library.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConversionStats {
    pub files_read: usize,
    pub footprints_read: usize,
    pub footprints_written: usize,
    pub diagnostics: usize,
}

/// Reads every `.fpl` file of the job's input directory and writes the
/// selected footprints as one KiCad `.mod` library.
pub fn convert_library(job: &LibraryJob) -> Result<ConversionStats> {
    let selection = job.selection()?;

    info!("Converting '{}'", job.input.display());
    let (library, read_stats) = Library::read_with(&job.input, job.strict)?;
    let footprints_read = library.len();

    let library = match &selection {
        Some(pattern) => library.select(pattern),
        None => library,
    };
    library.write(&job.output)?;

    Ok(ConversionStats {
        files_read: read_stats.files_read,
        footprints_read,
        footprints_written: library.len(),
        diagnostics: read_stats.diagnostics,
    })
}

/// Runs every job of `config` in order, stopping at the first failure.
pub fn run_jobs(config: &ConvertConfig) -> Result<Vec<ConversionStats>> {
    config.libraries.iter().map(convert_library).collect()
}
