use serde::{Deserialize, Serialize};

use crate::error::{GvizError, GvizResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("darkred", (139, 0, 0)),
    ("green", (0, 128, 0)),
    ("darkgreen", (0, 100, 0)),
    ("blue", (0, 0, 255)),
    ("darkblue", (0, 0, 139)),
    ("navy", (0, 0, 128)),
    ("steelblue", (70, 130, 180)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("yellow", (255, 255, 0)),
    ("gold", (255, 215, 0)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("brown", (165, 42, 42)),
    ("pink", (255, 192, 203)),
];

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Returns the color with its alpha channel multiplied by `factor`.
    #[must_use]
    pub fn with_alpha_factor(self, factor: f64) -> Self {
        Self {
            alpha: (self.alpha * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Parses a color name (`"darkblue"`), `#rrggbb`, `#rrggbbaa` or `"transparent"`.
    pub fn parse(raw: &str) -> GvizResult<Self> {
        let name = raw.trim().to_ascii_lowercase();
        if name == "transparent" || name == "none" {
            return Ok(Self::rgba(0.0, 0.0, 0.0, 0.0));
        }
        if let Some(hex) = name.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| {
                GvizError::InvalidData(format!("`{raw}` is not a valid hex color"))
            });
        }

        NAMED_COLORS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, (r, g, b))| Self::from_rgb8(*r, *g, *b))
            .ok_or_else(|| GvizError::InvalidData(format!("unknown color name `{raw}`")))
    }

    pub fn validate(self) -> GvizResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(GvizError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let channel = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
    let color = Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?);
    if hex.len() == 8 {
        Some(Color {
            alpha: f64::from(channel(6)?) / 255.0,
            ..color
        })
    } else {
        Some(color)
    }
}

/// Font family plus size in points, written as `"Sans 7"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f64,
}

impl Font {
    #[must_use]
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// Parses `"<family> <size>"`; the family may contain spaces.
    pub fn parse(raw: &str) -> GvizResult<Self> {
        let trimmed = raw.trim();
        let (family, size) = trimmed
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| GvizError::InvalidData(format!("`{raw}` is not `<family> <size>`")))?;
        let size: f64 = size
            .parse()
            .map_err(|_| GvizError::InvalidData(format!("font size in `{raw}` is not a number")))?;
        let font = Self::new(family.trim(), size);
        font.validate()?;
        Ok(font)
    }

    pub fn validate(&self) -> GvizResult<()> {
        if self.family.is_empty() {
            return Err(GvizError::InvalidData(
                "font family must not be empty".to_owned(),
            ));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(GvizError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}
