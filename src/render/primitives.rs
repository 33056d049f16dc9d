use std::str::FromStr;

use crate::core::{Color, Font};
use crate::error::{GvizError, GvizResult};
use crate::render::MarkerShape;

/// Stroke pattern for lines, named like the `linetype` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DotDash,
    LongDash,
}

impl LineDash {
    /// On/off dash lengths in points, scaled by the stroke width.
    #[must_use]
    pub fn pattern(self, stroke_width: f64) -> Vec<f64> {
        let unit = stroke_width.max(0.5);
        match self {
            Self::Solid => Vec::new(),
            Self::Dashed => vec![4.0 * unit, 2.0 * unit],
            Self::Dotted => vec![unit, 2.0 * unit],
            Self::DotDash => vec![unit, 2.0 * unit, 4.0 * unit, 2.0 * unit],
            Self::LongDash => vec![8.0 * unit, 3.0 * unit],
        }
    }
}

impl FromStr for LineDash {
    type Err = GvizError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "solid" => Ok(Self::Solid),
            "dash" | "dashed" => Ok(Self::Dashed),
            "dot" | "dotted" => Ok(Self::Dotted),
            "dotdash" | "dashdot" => Ok(Self::DotDash),
            "longdash" => Ok(Self::LongDash),
            other => Err(GvizError::InvalidData(format!("unknown line type `{other}`"))),
        }
    }
}

/// Draw command for one line segment in device points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub dash: LineDash,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            dash: LineDash::Solid,
        }
    }

    pub fn validate(self) -> GvizResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(GvizError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        validate_stroke_width(self.stroke_width)?;
        self.color.validate()
    }
}

/// Connected line through two or more points.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylinePrimitive {
    pub points: Vec<(f64, f64)>,
    pub stroke_width: f64,
    pub color: Color,
    pub dash: LineDash,
}

impl PolylinePrimitive {
    pub fn validate(&self) -> GvizResult<()> {
        if self.points.len() < 2 {
            return Err(GvizError::InvalidData(
                "polyline needs at least two points".to_owned(),
            ));
        }
        if self
            .points
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(GvizError::InvalidData(
                "polyline coordinates must be finite".to_owned(),
            ));
        }
        validate_stroke_width(self.stroke_width)?;
        self.color.validate()
    }
}

/// Filled rectangle with an optional border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
    pub border_color: Color,
    pub border_width: f64,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
            border_color: fill_color,
            border_width: 0.0,
        }
    }

    /// Rectangle spanning two corners in any order.
    #[must_use]
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64, fill_color: Color) -> Self {
        Self::new(
            x1.min(x2),
            y1.min(y2),
            (x2 - x1).abs(),
            (y2 - y1).abs(),
            fill_color,
        )
    }

    #[must_use]
    pub const fn with_border(mut self, border_color: Color, border_width: f64) -> Self {
        self.border_color = border_color;
        self.border_width = border_width;
        self
    }

    pub fn validate(self) -> GvizResult<()> {
        if !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(GvizError::InvalidData(
                "rect geometry must be finite".to_owned(),
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(GvizError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(GvizError::InvalidData(
                "rect border width must be finite and >= 0".to_owned(),
            ));
        }
        self.fill_color.validate()?;
        self.border_color.validate()
    }
}

/// Point symbol centered on `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPrimitive {
    pub shape: MarkerShape,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub stroke_width: f64,
}

impl MarkerPrimitive {
    pub fn validate(self) -> GvizResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(GvizError::InvalidData(
                "marker position must be finite".to_owned(),
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GvizError::InvalidData(
                "marker radius must be finite and > 0".to_owned(),
            ));
        }
        validate_stroke_width(self.stroke_width)?;
        self.stroke_color.validate()?;
        self.fill_color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to `TextPrimitive::y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextVAlign {
    Top,
    Middle,
    Bottom,
}

/// Draw command for one label in device points.
///
/// Alignment applies in the rotated text frame; `rotation_deg` turns the
/// label counter-clockwise around its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font: Font,
    pub color: Color,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
    pub rotation_deg: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font: Font,
        color: Color,
        h_align: TextHAlign,
        v_align: TextVAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font,
            color,
            h_align,
            v_align,
            rotation_deg: 0.0,
        }
    }

    #[must_use]
    pub fn rotated(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn validate(&self) -> GvizResult<()> {
        if self.text.is_empty() {
            return Err(GvizError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() || !self.rotation_deg.is_finite() {
            return Err(GvizError::InvalidData(
                "text placement must be finite".to_owned(),
            ));
        }
        self.font.validate()?;
        self.color.validate()
    }
}

/// One drawing command; a frame draws them in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(LinePrimitive),
    Polyline(PolylinePrimitive),
    Rect(RectPrimitive),
    Marker(MarkerPrimitive),
    Text(TextPrimitive),
}

impl Primitive {
    pub fn validate(&self) -> GvizResult<()> {
        match self {
            Self::Line(line) => line.validate(),
            Self::Polyline(polyline) => polyline.validate(),
            Self::Rect(rect) => rect.validate(),
            Self::Marker(marker) => marker.validate(),
            Self::Text(text) => text.validate(),
        }
    }
}

fn validate_stroke_width(stroke_width: f64) -> GvizResult<()> {
    if !stroke_width.is_finite() || stroke_width <= 0.0 {
        return Err(GvizError::InvalidData(
            "stroke width must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{LineDash, LinePrimitive, RectPrimitive};
    use crate::core::Color;

    #[test]
    fn line_types_parse_from_parameter_names() {
        assert_eq!("dash".parse::<LineDash>().expect("dash"), LineDash::Dashed);
        assert_eq!("solid".parse::<LineDash>().expect("solid"), LineDash::Solid);
        assert!("wiggly".parse::<LineDash>().is_err());
        assert!(LineDash::Solid.pattern(1.0).is_empty());
        assert_eq!(LineDash::Dashed.pattern(2.0), vec![8.0, 4.0]);
    }

    #[test]
    fn rect_from_corners_normalizes_orientation() {
        let rect = RectPrimitive::from_corners(10.0, 50.0, 4.0, 20.0, Color::BLACK);
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (4.0, 20.0, 6.0, 30.0));
        rect.validate().expect("valid rect");
    }

    #[test]
    fn zero_width_lines_are_invalid() {
        let line = LinePrimitive::new(0.0, 0.0, 1.0, 1.0, 0.0, Color::BLACK);
        assert!(line.validate().is_err());
    }
}
