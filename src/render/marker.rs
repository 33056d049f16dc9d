use std::f64::consts::FRAC_1_SQRT_2;
use std::str::FromStr;

use crate::error::GvizError;

const SIN_60: f64 = 0.866_025_403_784_438_6;

/// Point symbols accepted by the `shape` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerShape {
    Asterisk,
    #[default]
    Circle,
    Cross,
    Diamond,
    Dot,
    Plus,
    Square,
    Triangle,
    DownTriangle,
    RightTriangle,
    LeftTriangle,
}

/// Resolved outline of a marker in device points.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerGeometry {
    Circle { cx: f64, cy: f64, radius: f64 },
    Polygon(Vec<(f64, f64)>),
    Strokes(Vec<[(f64, f64); 2]>),
}

impl MarkerShape {
    pub const ALL: [Self; 11] = [
        Self::Asterisk,
        Self::Circle,
        Self::Cross,
        Self::Diamond,
        Self::Dot,
        Self::Plus,
        Self::Square,
        Self::Triangle,
        Self::DownTriangle,
        Self::RightTriangle,
        Self::LeftTriangle,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Asterisk => "asterisk",
            Self::Circle => "circle",
            Self::Cross => "cross",
            Self::Diamond => "diamond",
            Self::Dot => "dot",
            Self::Plus => "plus",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::DownTriangle => "down-triangle",
            Self::RightTriangle => "right-triangle",
            Self::LeftTriangle => "left-triangle",
        }
    }

    #[must_use]
    pub fn geometry(self, cx: f64, cy: f64, radius: f64) -> MarkerGeometry {
        let r = radius;
        match self {
            Self::Circle => MarkerGeometry::Circle { cx, cy, radius: r },
            Self::Dot => MarkerGeometry::Circle {
                cx,
                cy,
                radius: r * 0.5,
            },
            Self::Square => MarkerGeometry::Polygon(vec![
                (cx - r, cy - r),
                (cx + r, cy - r),
                (cx + r, cy + r),
                (cx - r, cy + r),
            ]),
            Self::Diamond => MarkerGeometry::Polygon(vec![
                (cx, cy - r),
                (cx + r, cy),
                (cx, cy + r),
                (cx - r, cy),
            ]),
            // Device y grows downward, so "up" is negative y.
            Self::Triangle => MarkerGeometry::Polygon(vec![
                (cx, cy - r),
                (cx + r * SIN_60, cy + r * 0.5),
                (cx - r * SIN_60, cy + r * 0.5),
            ]),
            Self::DownTriangle => MarkerGeometry::Polygon(vec![
                (cx, cy + r),
                (cx - r * SIN_60, cy - r * 0.5),
                (cx + r * SIN_60, cy - r * 0.5),
            ]),
            Self::RightTriangle => MarkerGeometry::Polygon(vec![
                (cx + r, cy),
                (cx - r * 0.5, cy + r * SIN_60),
                (cx - r * 0.5, cy - r * SIN_60),
            ]),
            Self::LeftTriangle => MarkerGeometry::Polygon(vec![
                (cx - r, cy),
                (cx + r * 0.5, cy - r * SIN_60),
                (cx + r * 0.5, cy + r * SIN_60),
            ]),
            Self::Plus => MarkerGeometry::Strokes(plus_strokes(cx, cy, r).to_vec()),
            Self::Cross => MarkerGeometry::Strokes(cross_strokes(cx, cy, r).to_vec()),
            Self::Asterisk => {
                let mut strokes = plus_strokes(cx, cy, r).to_vec();
                strokes.extend(cross_strokes(cx, cy, r));
                MarkerGeometry::Strokes(strokes)
            }
        }
    }
}

fn plus_strokes(cx: f64, cy: f64, r: f64) -> [[(f64, f64); 2]; 2] {
    [[(cx - r, cy), (cx + r, cy)], [(cx, cy - r), (cx, cy + r)]]
}

fn cross_strokes(cx: f64, cy: f64, r: f64) -> [[(f64, f64); 2]; 2] {
    let d = r * FRAC_1_SQRT_2;
    [
        [(cx - d, cy - d), (cx + d, cy + d)],
        [(cx - d, cy + d), (cx + d, cy - d)],
    ]
}

impl FromStr for MarkerShape {
    type Err = GvizError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|shape| shape.name() == name)
            .ok_or_else(|| GvizError::InvalidData(format!("unknown marker shape `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerGeometry, MarkerShape};

    #[test]
    fn every_shape_round_trips_through_its_name() {
        for shape in MarkerShape::ALL {
            assert_eq!(shape.name().parse::<MarkerShape>().expect("parse"), shape);
        }
        assert_eq!(
            "down_triangle".parse::<MarkerShape>().expect("underscore"),
            MarkerShape::DownTriangle
        );
        assert!("hexagon".parse::<MarkerShape>().is_err());
    }

    #[test]
    fn triangle_points_up_in_device_space() {
        let MarkerGeometry::Polygon(points) = MarkerShape::Triangle.geometry(10.0, 10.0, 2.0)
        else {
            panic!("triangle must be a polygon");
        };
        assert_eq!(points[0], (10.0, 8.0));
        assert!(points[1..].iter().all(|(_, y)| *y > 10.0));
    }

    #[test]
    fn asterisk_combines_plus_and_cross() {
        match MarkerShape::Asterisk.geometry(0.0, 0.0, 1.0) {
            MarkerGeometry::Strokes(strokes) => assert_eq!(strokes.len(), 4),
            other => panic!("unexpected geometry: {other:?}"),
        }
    }
}
