// src/file_writer.rs

use crate::converter::convert_footprint;
use crate::error::{Error, Result};
use crate::fpl_models::Library;
use log::info;
use std::fs;
use std::path::Path;

const KICAD_MOD_HEADER: &str = "PCBNEW-LibModule-V1  Sat 01 Jan 2000 00:00:00 PM PDT\n# encoding utf-8\n";

const KICAD_MOD_FOOTER: &str = "$EndLIBRARY\n";

impl Library {
    /// Renders the whole library in the legacy KiCad `.mod` format. Footprints
    /// are sorted by name in both the index and the module list.
    pub fn to_kicad_mod(&self) -> String {
        let footprints = self.sorted();

        let mut out = String::from(KICAD_MOD_HEADER);
        out.push_str("$INDEX\n");
        for footprint in &footprints {
            out.push_str(&footprint.name);
            out.push('\n');
        }
        out.push_str("$EndINDEX\n");

        for footprint in &footprints {
            out.push_str(&convert_footprint(footprint).to_kicad_mod_entry());
        }

        out.push_str(KICAD_MOD_FOOTER);
        out
    }

    /// Writes the library to `path` as a legacy KiCad `.mod` file.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(path, self.to_kicad_mod()).map_err(|e| Error::io(path, e))?;
        info!("Wrote {} footprints to '{}'", self.len(), path.display());
        Ok(())
    }
}
