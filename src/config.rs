// src/config.rs

//! Conversion jobs, read from a JSON file or built from command line
//! arguments.
//!
//! ```json
//! {
//!   "libraries": [
//!     { "input": "IPC7351-Nominal", "output": "out/IPC7351-Nominal.mod" },
//!     { "input": "IPC7351-Nominal", "output": "out/test.mod",
//!       "select": "^QFP80P1200X1200X120-44N$", "strict": true }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One library directory converted into one `.mod` file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LibraryJob {
    /// Directory holding the `.fpl` files.
    pub input: PathBuf,
    /// Path of the `.mod` file to write.
    pub output: PathBuf,
    /// Only footprints whose name matches this regex are written.
    #[serde(default)]
    pub select: Option<String>,
    /// Fail the job on the first file with any diagnostic.
    #[serde(default)]
    pub strict: bool,
}

impl LibraryJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        LibraryJob {
            input: input.into(),
            output: output.into(),
            select: None,
            strict: false,
        }
    }

    /// Compiles the `select` pattern, if any.
    pub fn selection(&self) -> Result<Option<Regex>> {
        self.select
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(Error::from)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    pub libraries: Vec<LibraryJob>,
}

impl ConvertConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ConvertConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        ConvertConfig::from_json(&text)
    }

    /// Checks that there is work to do and that every pattern compiles.
    pub fn validate(&self) -> Result<()> {
        if self.libraries.is_empty() {
            return Err(Error::MissingData(
                "configuration lists no libraries".to_string(),
            ));
        }
        for job in &self.libraries {
            job.selection()?;
        }
        Ok(())
    }
}
