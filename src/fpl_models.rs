// src/fpl_models.rs

//! In-memory model of an FPL footprint library. All lengths are in the FPL
//! native unit (micrometres); every `Option` field is `None` when the tag was
//! not present in the source text.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub left: i64,
    pub bottom: i64,
    pub right: i64,
    pub top: i64,
}

/// Placement of the reference or value text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Text {
    pub height: i64,
    pub left: i64,
    pub bottom: i64,
    pub angle: i64, // in degrees
    pub line_width: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub x: i64,
    pub y: i64,
    pub side_style: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    pub line_width: i64,
    pub start_x: i64,
    pub start_y: i64,
    pub corners: Vec<Corner>,
    /// `Some(style)` when the polyline is closed back to its start point.
    pub close_style: Option<i64>,
}

impl Polyline {
    pub fn is_closed(&self) -> bool {
        self.close_style.is_some()
    }
}

/// One copper face of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pad {
    pub shape: i64,
    pub width: i64,
    pub length1: i64,
    pub length2: i64,
    pub corner_radius: i64,
}

impl Pad {
    /// Total pad length along the pin axis. Widened so two extreme lengths
    /// cannot overflow.
    pub fn length(&self) -> i128 {
        i128::from(self.length1) + i128::from(self.length2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub name: String,
    pub hole_diameter: i64,
    pub x: i64,
    pub y: i64,
    pub angle: i64, // in degrees
    pub top: Option<Pad>,
    pub inner: Option<Pad>,
    pub bottom: Option<Pad>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Footprint {
    pub name: String,
    pub author: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub units: Option<String>,
    pub selection_rectangle: Option<Rectangle>,
    pub reference_text: Option<Text>,
    pub value_text: Option<Text>,
    pub centroid: Option<Rectangle>,
    /// Pin count as declared by `n_pins:`. Informational only.
    pub declared_pins: Option<i64>,
    pub polylines: Vec<Polyline>,
    pub pins: Vec<Pin>,
}

impl Footprint {
    pub fn new(name: impl Into<String>) -> Self {
        Footprint {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// An ordered collection of footprints, usually everything read from one
/// directory of `.fpl` files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Library {
    pub footprints: Vec<Footprint>,
}

impl Library {
    pub fn new(footprints: Vec<Footprint>) -> Self {
        Library { footprints }
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    /// Footprints ordered by name. Ties keep their read order.
    pub fn sorted(&self) -> Vec<&Footprint> {
        let mut footprints: Vec<&Footprint> = self.footprints.iter().collect();
        footprints.sort_by(|a, b| a.name.cmp(&b.name));
        footprints
    }

    /// Keeps only the footprints whose name matches `pattern`.
    pub fn select(self, pattern: &regex::Regex) -> Library {
        Library {
            footprints: self
                .footprints
                .into_iter()
                .filter(|footprint| pattern.is_match(&footprint.name))
                .collect(),
        }
    }
}
