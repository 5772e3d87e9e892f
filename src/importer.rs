// src/importer.rs

use crate::cursor::{Cursor, Diagnostic, DiagnosticKind};
use crate::error::{Error, Result};
use crate::fpl_models::*;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub const FPL_EXTENSION: &str = "fpl";

/// Footprints read from one file together with every problem reported while
/// reading it.
#[derive(Debug)]
pub struct ParsedFile {
    pub footprints: Vec<Footprint>,
    pub diagnostics: Vec<Diagnostic>,
}

fn parse_rectangle(cursor: &mut Cursor) -> Rectangle {
    Rectangle {
        left: cursor.long_parse(),
        bottom: cursor.long_parse(),
        right: cursor.long_parse(),
        top: cursor.long_parse(),
    }
}

fn parse_text(cursor: &mut Cursor) -> Text {
    Text {
        height: cursor.long_parse(),
        left: cursor.long_parse(),
        bottom: cursor.long_parse(),
        angle: cursor.long_parse(),
        line_width: cursor.long_parse(),
    }
}

fn parse_corner(cursor: &mut Cursor) -> Option<Corner> {
    if !cursor.tag_match("next_corner:") {
        return None;
    }
    let corner = Corner {
        x: cursor.long_parse(),
        y: cursor.long_parse(),
        side_style: cursor.long_parse(),
    };
    cursor.end_of_line();
    Some(corner)
}

fn parse_pad(cursor: &mut Cursor, tag: &str) -> Option<Pad> {
    if !cursor.tag_match(tag) {
        return None;
    }
    let pad = Pad {
        shape: cursor.long_parse(),
        width: cursor.long_parse(),
        length1: cursor.long_parse(),
        length2: cursor.long_parse(),
        corner_radius: cursor.long_parse(),
    };
    cursor.end_of_line();
    Some(pad)
}

pub fn parse_polyline(cursor: &mut Cursor) -> Option<Polyline> {
    if !cursor.tag_match("outline_polyline:") {
        return None;
    }
    let line_width = cursor.long_parse();
    let start_x = cursor.long_parse();
    let start_y = cursor.long_parse();
    cursor.end_of_line();

    let corners = std::iter::from_fn(|| parse_corner(cursor)).collect();

    let close_style = if cursor.tag_match("close_polyline:") {
        let style = cursor.long_parse();
        cursor.end_of_line();
        Some(style)
    } else {
        None
    };

    Some(Polyline {
        line_width,
        start_x,
        start_y,
        corners,
        close_style,
    })
}

pub fn parse_pin(cursor: &mut Cursor) -> Option<Pin> {
    if !cursor.tag_match("pin:") {
        return None;
    }
    let name = cursor.string_parse();
    let hole_diameter = cursor.long_parse();
    let x = cursor.long_parse();
    let y = cursor.long_parse();
    let angle = cursor.long_parse();
    cursor.end_of_line();

    // Pad faces always appear in this order.
    let top = parse_pad(cursor, "top_pad:");
    let inner = parse_pad(cursor, "inner_pad:");
    let bottom = parse_pad(cursor, "bottom_pad:");

    Some(Pin {
        name,
        hole_diameter,
        x,
        y,
        angle,
        top,
        inner,
        bottom,
    })
}

type FieldParser = fn(&mut Cursor, &mut Footprint);

/// Optional header fields that may follow `name:`, in the order they must
/// appear. Each entry consumes its value; the caller consumes the end of line.
const HEADER_FIELDS: &[(&str, FieldParser)] = &[
    ("author:", |c, fp| fp.author = Some(c.string_parse())),
    ("source:", |c, fp| fp.source = Some(c.string_parse())),
    ("description:", |c, fp| fp.description = Some(c.string_parse())),
    ("units:", |c, fp| fp.units = Some(c.string_parse())),
    ("sel_rect:", |c, fp| fp.selection_rectangle = Some(parse_rectangle(c))),
    ("ref_text:", |c, fp| fp.reference_text = Some(parse_text(c))),
    ("value_text:", |c, fp| fp.value_text = Some(parse_text(c))),
    ("centroid:", |c, fp| fp.centroid = Some(parse_rectangle(c))),
];

/// Parses one footprint. `None` means no `name:` tag was found at the
/// current position.
pub fn parse_footprint(cursor: &mut Cursor) -> Option<Footprint> {
    if !cursor.tag_match("name:") {
        return None;
    }
    let mut footprint = Footprint::new(cursor.string_parse());
    cursor.end_of_line();

    for (tag, parse_field) in HEADER_FIELDS {
        if cursor.tag_match(tag) {
            parse_field(cursor, &mut footprint);
            cursor.end_of_line();
        }
    }

    footprint.polylines = std::iter::from_fn(|| parse_polyline(cursor)).collect();

    if cursor.tag_match("n_pins:") {
        footprint.declared_pins = Some(cursor.long_parse());
        cursor.end_of_line();
    }

    footprint.pins = std::iter::from_fn(|| parse_pin(cursor)).collect();

    // Blank lines up to the next footprint.
    loop {
        let before = cursor.offset();
        cursor.new_lines_skip();
        if cursor.offset() == before {
            break;
        }
    }

    debug!(
        "{}: parsed footprint '{}' ({} polylines, {} pins)",
        cursor.file_name(),
        footprint.name,
        footprint.polylines.len(),
        footprint.pins.len()
    );
    Some(footprint)
}

/// Parses every footprint in `contents`. `file_name` only tags diagnostics.
pub fn parse_footprints(contents: impl Into<Vec<u8>>, file_name: &str) -> ParsedFile {
    let mut cursor = Cursor::new(contents, file_name);
    let footprints: Vec<Footprint> = std::iter::from_fn(|| parse_footprint(&mut cursor)).collect();

    if !cursor.is_empty() {
        cursor.report(DiagnosticKind::UnexpectedContent);
    }

    ParsedFile {
        footprints,
        diagnostics: cursor.into_diagnostics(),
    }
}

/// Lists the `.fpl` files in `directory`, sorted by file name.
pub fn list_fpl_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(directory).map_err(|e| Error::io(directory, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(directory, e))?.path();
        let is_fpl = path
            .extension()
            .is_some_and(|extension| extension == FPL_EXTENSION);
        if is_fpl && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads and parses one `.fpl` file. With `strict` set, any diagnostic turns
/// into an error.
pub fn read_fpl_file(path: &Path, strict: bool) -> Result<ParsedFile> {
    let contents = fs::read(path).map_err(|e| Error::io(path, e))?;
    let parsed = parse_footprints(contents, &path.display().to_string());

    if strict && !parsed.diagnostics.is_empty() {
        return Err(Error::Malformed {
            path: path.to_path_buf(),
            diagnostics: parsed.diagnostics,
        });
    }
    Ok(parsed)
}

/// Summary of one directory read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    pub files_read: usize,
    pub diagnostics: usize,
}

impl Library {
    /// Reads every `.fpl` file in `directory` into one library, in file name
    /// order and then file order.
    pub fn read(directory: &Path) -> Result<Library> {
        Library::read_with(directory, false).map(|(library, _)| library)
    }

    pub fn read_with(directory: &Path, strict: bool) -> Result<(Library, ReadStats)> {
        let mut footprints = Vec::new();
        let mut stats = ReadStats::default();

        for path in list_fpl_files(directory)? {
            debug!("Reading footprint file {}", path.display());
            let parsed = read_fpl_file(&path, strict)?;
            stats.files_read += 1;
            stats.diagnostics += parsed.diagnostics.len();
            footprints.extend(parsed.footprints);
        }

        info!(
            "Read in {} footprints from '{}'",
            footprints.len(),
            directory.display()
        );
        Ok((Library::new(footprints), stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOIC: &str = "\
name: \"SOIC127P600X175-8N\"
author: \"Wayne\"
source: \"IPC-7351 calculator\"
description: \"Small outline, 8 pins\"
units: mm
sel_rect: -3750 -2700 3750 2700
ref_text: 1000 -500 2500 0 100
value_text: 1000 -500 -2500 90 100
centroid: 0 0 0 0
outline_polyline: 200 -1950 2450
next_corner: 1950 2450 0
next_corner: 1950 -2450 0
close_polyline: 0
n_pins: 2
pin: \"1\" 0 -2700 1905 0
top_pad: 2 600 775 775 0
pin: \"2\" 0 2700 1905 90
top_pad: 2 600 775 775 0
inner_pad: 1 0 0 0 0
bottom_pad: 2 600 775 775 0

";

    #[test]
    fn parses_every_header_field() {
        let parsed = parse_footprints(SOIC, "soic.fpl");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        assert_eq!(parsed.footprints.len(), 1);

        let fp = &parsed.footprints[0];
        assert_eq!(fp.name, "SOIC127P600X175-8N");
        assert_eq!(fp.author.as_deref(), Some("Wayne"));
        assert_eq!(fp.source.as_deref(), Some("IPC-7351 calculator"));
        assert_eq!(fp.description.as_deref(), Some("Small outline, 8 pins"));
        assert_eq!(fp.units.as_deref(), Some("mm"));
        assert_eq!(
            fp.selection_rectangle,
            Some(Rectangle {
                left: -3750,
                bottom: -2700,
                right: 3750,
                top: 2700
            })
        );
        assert_eq!(
            fp.value_text,
            Some(Text {
                height: 1000,
                left: -500,
                bottom: -2500,
                angle: 90,
                line_width: 100
            })
        );
        assert_eq!(fp.centroid, Some(Rectangle::default()));
        assert_eq!(fp.declared_pins, Some(2));
    }

    #[test]
    fn parses_polylines_and_pins() {
        let parsed = parse_footprints(SOIC, "soic.fpl");
        let fp = &parsed.footprints[0];

        assert_eq!(fp.polylines.len(), 1);
        let polyline = &fp.polylines[0];
        assert_eq!((polyline.start_x, polyline.start_y), (-1950, 2450));
        assert_eq!(polyline.corners.len(), 2);
        assert_eq!(polyline.corners[1].y, -2450);
        assert_eq!(polyline.close_style, Some(0));

        assert_eq!(fp.pins.len(), 2);
        assert_eq!(fp.pins[0].name, "1");
        assert!(fp.pins[0].inner.is_none());
        assert!(fp.pins[0].bottom.is_none());
        assert_eq!(fp.pins[1].angle, 90);
        assert_eq!(fp.pins[1].top.map(|p| p.length()), Some(1550));
        assert_eq!(fp.pins[1].inner.map(|p| p.shape), Some(1));
        assert!(fp.pins[1].bottom.is_some());
    }

    #[test]
    fn optional_fields_default_to_absent() {
        let parsed = parse_footprints("name: BARE\n", "bare.fpl");
        assert!(parsed.diagnostics.is_empty());
        let fp = &parsed.footprints[0];
        assert_eq!(fp.name, "BARE");
        assert!(fp.author.is_none());
        assert!(fp.description.is_none());
        assert!(fp.reference_text.is_none());
        assert!(fp.declared_pins.is_none());
        assert!(fp.polylines.is_empty());
        assert!(fp.pins.is_empty());
    }

    #[test]
    fn open_polyline_has_no_close_style() {
        let parsed = parse_footprints(
            "name: L\noutline_polyline: 100 0 0\nnext_corner: 10 10 1\n",
            "l.fpl",
        );
        let polyline = &parsed.footprints[0].polylines[0];
        assert!(!polyline.is_closed());
        assert_eq!(polyline.corners[0].side_style, 1);
    }

    #[test]
    fn fields_out_of_order_are_unexpected_content() {
        // `author:` after `description:` is not part of the grammar.
        let parsed = parse_footprints("name: X\ndescription: d\nauthor: a\n", "x.fpl");
        assert_eq!(parsed.footprints.len(), 1);
        assert!(parsed.footprints[0].author.is_none());
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::UnexpectedContent);
        assert_eq!(parsed.diagnostics[0].line, 3);
    }

    #[test]
    fn reads_back_to_back_footprints() {
        let text = "name: \"B\"\nn_pins: 0\n\nname: \"A\"\nn_pins: 0\n";
        let parsed = parse_footprints(text, "two.fpl");
        assert!(parsed.diagnostics.is_empty());
        let names: Vec<&str> = parsed.footprints.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn bad_values_are_reported_and_defaulted() {
        let parsed = parse_footprints("name: X\nsel_rect: 1 two 3 4\n", "bad.fpl");
        let fp = &parsed.footprints[0];
        assert_eq!(fp.selection_rectangle.map(|r| r.left), Some(1));
        let kinds: Vec<DiagnosticKind> = parsed.diagnostics.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&DiagnosticKind::BadNumber));
        assert!(kinds.contains(&DiagnosticKind::GarbageAtEndOfLine));
    }

    #[test]
    fn empty_input_has_no_footprints() {
        let parsed = parse_footprints("", "empty.fpl");
        assert!(parsed.footprints.is_empty());
        assert!(parsed.diagnostics.is_empty());
    }
}
