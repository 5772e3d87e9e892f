// src/converter.rs

use crate::{fpl_models::*, kicad_models::*};
use glam::I64Vec2;
use log::warn;

/// Native units (micrometres) per tenth-mil.
pub const MICROMETRES_PER_TENTH_MIL: i64 = 2540;

/// Converts micrometres to tenth-mils, truncating toward zero for negative
/// values as well.
pub fn integer_mils(micrometres: i64) -> i64 {
    // Rust integer division already truncates toward zero.
    micrometres / MICROMETRES_PER_TENTH_MIL
}

/// [`integer_mils`] for values wider than `i64`, such as summed pad lengths.
fn wide_integer_mils(micrometres: i128) -> i64 {
    // |micrometres| <= 2 * i64::MAX, so the quotient always fits in i64.
    (micrometres / i128::from(MICROMETRES_PER_TENTH_MIL)) as i64
}

/// Converts an FPL point to a KiCad point. The KiCad y axis points down.
fn to_kicad_point(x: i64, y: i64) -> I64Vec2 {
    I64Vec2::new(integer_mils(x), -integer_mils(y))
}

/// One `DS` segment per polyline edge, plus a closing segment for closed
/// polylines.
fn convert_polyline(polyline: &Polyline) -> Vec<KiEdge> {
    let width = integer_mils(polyline.line_width);
    let start = to_kicad_point(polyline.start_x, polyline.start_y);

    let mut edges = Vec::with_capacity(polyline.corners.len() + 1);
    let mut previous = start;
    for corner in &polyline.corners {
        let point = to_kicad_point(corner.x, corner.y);
        edges.push(KiEdge {
            start: previous,
            end: point,
            width,
        });
        previous = point;
    }

    if polyline.is_closed() {
        edges.push(KiEdge {
            start: previous,
            end: start,
            width,
        });
    }
    edges
}

/// Builds a pad from the pin's top face. Pins without a top face become a
/// zero-size placeholder pad.
fn convert_pin(pin: &Pin, footprint_name: &str) -> KiPad {
    let size = match &pin.top {
        Some(top) => I64Vec2::new(integer_mils(top.width), wide_integer_mils(top.length())),
        None => {
            warn!(
                "Pin '{}' of footprint '{}' has no top pad; writing a zero-size pad",
                pin.name, footprint_name
            );
            I64Vec2::ZERO
        }
    };

    let shape = match pin.angle {
        0 => KiPadShape::Rect(I64Vec2::new(size.y, size.x)),
        90 => KiPadShape::Rect(size),
        angle => {
            warn!(
                "Pin '{}' of footprint '{}' has unsupported angle {}",
                pin.name, footprint_name, angle
            );
            KiPadShape::UnsupportedAngle(angle)
        }
    };

    KiPad {
        name: pin.name.clone(),
        shape,
        pos: to_kicad_point(pin.x, pin.y),
    }
}

/// Converts an FPL footprint to a legacy KiCad module.
pub fn convert_footprint(footprint: &Footprint) -> KiModule {
    let edges = footprint.polylines.iter().flat_map(convert_polyline).collect();
    let pads = footprint
        .pins
        .iter()
        .map(|pin| convert_pin(pin, &footprint.name))
        .collect();

    KiModule {
        name: footprint.name.clone(),
        description: footprint.description.clone().unwrap_or_default(),
        texts: vec![KiText::placeholder(0), KiText::placeholder(1)],
        edges,
        pads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(width: i64, length1: i64, length2: i64) -> Pad {
        Pad {
            shape: 2,
            width,
            length1,
            length2,
            corner_radius: 0,
        }
    }

    fn pin(angle: i64, top: Option<Pad>) -> Pin {
        Pin {
            name: "1".to_string(),
            hole_diameter: 0,
            x: 25400,
            y: 5080,
            angle,
            top,
            inner: None,
            bottom: None,
        }
    }

    #[test]
    fn integer_mils_truncates_toward_zero() {
        assert_eq!(integer_mils(0), 0);
        assert_eq!(integer_mils(2539), 0);
        assert_eq!(integer_mils(-2539), 0);
        assert_eq!(integer_mils(2540), 1);
        assert_eq!(integer_mils(-2540), -1);
        assert_eq!(integer_mils(5079), 1);
        assert_eq!(integer_mils(-5079), -1);
    }

    #[test]
    fn integer_mils_is_odd() {
        for value in [-1_000_000, -25401, -2541, -1, 1, 2541, 25401, 1_000_000] {
            assert_eq!(integer_mils(-value), -integer_mils(value));
        }
    }

    #[test]
    fn open_polyline_emits_one_edge_per_corner() {
        let polyline = Polyline {
            line_width: 2540,
            start_x: 0,
            start_y: 0,
            corners: vec![
                Corner { x: 25400, y: 0, side_style: 0 },
                Corner { x: 25400, y: 25400, side_style: 0 },
            ],
            close_style: None,
        };
        let edges = convert_polyline(&polyline);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].start, I64Vec2::new(10, 0));
        assert_eq!(edges[1].end, I64Vec2::new(10, -10));
        assert_eq!(edges[1].width, 1);
    }

    #[test]
    fn closed_polyline_returns_to_start() {
        let polyline = Polyline {
            line_width: 0,
            start_x: -2540,
            start_y: 2540,
            corners: vec![Corner { x: 2540, y: 2540, side_style: 0 }],
            close_style: Some(0),
        };
        let edges = convert_polyline(&polyline);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].start, I64Vec2::new(1, -1));
        assert_eq!(edges[1].end, I64Vec2::new(-1, -1));
    }

    #[test]
    fn closed_polyline_without_corners_has_degenerate_edge() {
        let polyline = Polyline {
            line_width: 0,
            start_x: 2540,
            start_y: 0,
            corners: vec![],
            close_style: Some(1),
        };
        let edges = convert_polyline(&polyline);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].start, edges[0].end);
    }

    #[test]
    fn pad_dimensions_follow_pin_angle() {
        let top = Some(pad(2540, 5080, 2540));

        let horizontal = convert_pin(&pin(0, top), "FP");
        assert_eq!(horizontal.shape, KiPadShape::Rect(I64Vec2::new(3, 1)));
        assert_eq!(horizontal.pos, I64Vec2::new(10, -2));

        let vertical = convert_pin(&pin(90, top), "FP");
        assert_eq!(vertical.shape, KiPadShape::Rect(I64Vec2::new(1, 3)));
    }

    #[test]
    fn extreme_pad_lengths_do_not_overflow() {
        let top = Some(pad(600, i64::MAX, i64::MAX));
        let converted = convert_pin(&pin(90, top), "BIG");
        let expected = (2 * i128::from(i64::MAX) / 2540) as i64;
        assert_eq!(converted.shape, KiPadShape::Rect(I64Vec2::new(0, expected)));

        let top = Some(pad(600, i64::MIN + 1, -1));
        let converted = convert_pin(&pin(90, top), "BIG");
        assert_eq!(
            converted.shape,
            KiPadShape::Rect(I64Vec2::new(0, -(i64::MAX / 2540)))
        );
    }

    #[test]
    fn other_angles_are_marked_unsupported() {
        let converted = convert_pin(&pin(45, Some(pad(1, 1, 1))), "FP");
        assert_eq!(converted.shape, KiPadShape::UnsupportedAngle(45));
    }

    #[test]
    fn missing_top_pad_becomes_zero_size() {
        let converted = convert_pin(&pin(0, None), "FP");
        assert_eq!(converted.shape, KiPadShape::Rect(I64Vec2::ZERO));
    }

    #[test]
    fn empty_footprint_still_has_texts() {
        let module = convert_footprint(&Footprint::new("EMPTY"));
        assert_eq!(module.texts.len(), 2);
        assert!(module.edges.is_empty());
        assert!(module.pads.is_empty());
        assert_eq!(module.description, "");
    }
}
