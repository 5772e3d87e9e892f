// src/kicad_models.rs

use glam::I64Vec2; // Integer vectors, coordinates are in tenth-mils
use std::fmt::Write;

/// Layer mask written for every surface-mount pad.
pub const SMD_LAYER_MASK: u32 = 0x0088_8000;

/// Silkscreen layer used for outline segments and texts.
const SILKSCREEN_LAYER: u32 = 21;

/// A reference (`T0`) or value (`T1`) text record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KiText {
    pub field_number: u32,
    pub pos: I64Vec2,
    pub size: I64Vec2,
    pub pen_width: i64,
}

impl KiText {
    /// Placeholder text drawn at the origin with a fixed size.
    pub fn placeholder(field_number: u32) -> Self {
        KiText {
            field_number,
            pos: I64Vec2::ZERO,
            size: I64Vec2::new(400, 400),
            pen_width: 80,
        }
    }
}

/// A straight silkscreen segment (`DS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KiEdge {
    pub start: I64Vec2,
    pub end: I64Vec2,
    pub width: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KiPadShape {
    /// Rectangular pad with its x/y size.
    Rect(I64Vec2),
    /// Rotation the legacy rectangular pad record cannot express.
    UnsupportedAngle(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KiPad {
    pub name: String,
    pub shape: KiPadShape,
    pub pos: I64Vec2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KiModule {
    pub name: String,
    pub description: String,
    pub texts: Vec<KiText>,
    pub edges: Vec<KiEdge>,
    pub pads: Vec<KiPad>,
}

impl KiModule {
    /// Generates the `$MODULE` ... `$EndMODULE` block of a legacy `.mod` library.
    pub fn to_kicad_mod_entry(&self) -> String {
        let mut out = String::new();
        self.write_entry(&mut out)
            .expect("formatting into a String cannot fail");
        out
    }

    fn write_entry(&self, out: &mut String) -> std::fmt::Result {
        let timestamp = 0u32;
        let flags = 0u32;

        writeln!(out, "$MODULE {}", self.name)?;
        writeln!(out, "Po 0 0 0 15 {:08x} {:08x} ~~", timestamp, flags)?;
        writeln!(out, "Li {}", self.name)?;
        writeln!(out, "Cd {}", self.description)?;
        writeln!(out, "Kw CMS XXX")?;
        writeln!(out, "Sc {:08x}", timestamp)?;
        writeln!(out, "AR {}", self.name)?;
        writeln!(out, "Op 0 0 0")?;
        writeln!(out, "At SMD")?;

        for text in &self.texts {
            writeln!(
                out,
                "T{} {} {} {} {} 0 {} N V {} N ~",
                text.field_number,
                text.pos.x,
                text.pos.y,
                text.size.x,
                text.size.y,
                text.pen_width,
                SILKSCREEN_LAYER
            )?;
        }

        for edge in &self.edges {
            writeln!(
                out,
                "DS {} {} {} {} {} {}",
                edge.start.x, edge.start.y, edge.end.x, edge.end.y, edge.width, SILKSCREEN_LAYER
            )?;
        }

        for pad in &self.pads {
            writeln!(out, "$PAD")?;
            match pad.shape {
                KiPadShape::Rect(size) => {
                    writeln!(out, "Sh \"{}\" R {} {} 0 0 0", pad.name, size.x, size.y)?
                }
                KiPadShape::UnsupportedAngle(angle) => writeln!(out, "Pad Angle={}", angle)?,
            }
            writeln!(out, "Dr 0 0 0")?;
            writeln!(out, "At SMD N {:08x}", SMD_LAYER_MASK)?;
            writeln!(out, "Ne 0 \"\"")?;
            writeln!(out, "Po {} {}", pad.pos.x, pad.pos.y)?;
            writeln!(out, "$EndPAD")?;
        }

        writeln!(out, "$EndMODULE  {}", self.name)
    }
}
