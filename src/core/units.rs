use crate::error::{GvizError, GvizResult};

/// Device unit: one PDF point (1/72 inch).
pub const PT: f64 = 1.0;
pub const INCH: f64 = 72.0;
pub const CM: f64 = INCH / 2.54;
pub const MM: f64 = CM / 10.0;

/// Parses a length such as `"8mm"`, `"1.5 cm"`, `"12pt"` or `"1in"` into points.
///
/// A bare number is interpreted as points.
pub fn parse_length(raw: &str) -> GvizResult<f64> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let value: f64 = number.trim().parse().map_err(|_| {
        GvizError::InvalidData(format!("`{raw}` is not a length (expected e.g. `8mm`)"))
    })?;

    let factor = match unit.trim() {
        "" | "pt" => PT,
        "mm" => MM,
        "cm" => CM,
        "in" | "inch" => INCH,
        other => {
            return Err(GvizError::InvalidData(format!(
                "unknown length unit `{other}` in `{raw}`"
            )));
        }
    };

    let points = value * factor;
    if !points.is_finite() {
        return Err(GvizError::InvalidData(format!(
            "length `{raw}` must be finite"
        )));
    }
    Ok(points)
}
