use crate::core::{CM, MM, ParamValue, Params};

/// Built-in parameter environment of the root frame.
///
/// Every parameter a track reads has an entry here, so a lookup only fails
/// when a user explicitly sets `nothing` on a key without a fallback (or
/// leaves out per-track data such as `y`).
#[must_use]
pub fn default_params() -> Params {
    Params::new()
        // Track box.
        .with("width", 20.0 * CM)
        .with("height", 2.0 * CM)
        .with("margin_top", 2.0 * MM)
        .with("margin_bottom", 2.0 * MM)
        .with("margin_left", 3.0 * CM)
        .with("margin_right", 1.0 * CM)
        .with("track_spacing", 5.0 * MM)
        // Axes.
        .with("axis_line_width", 0.5)
        .with("axis_color", "black")
        .with("axis_font", "Sans 7")
        .with("axis_tick_length", 1.0 * MM)
        // Titles.
        .with("title", ParamValue::Nothing)
        .with("title_color", "black")
        .with("title_font", "Sans 8")
        // Data tracks.
        .with("ymin", ParamValue::Nothing)
        .with("ymax", ParamValue::Nothing)
        .with("base_line_y", ParamValue::Nothing)
        .with("base_line_color", "gray")
        .with("base_line_width", 0.5)
        .with("color", "black")
        .with("fill", "black")
        .with("size", 1.5)
        .with("linetype", "solid")
        .with("alpha", 1.0)
        .with("shape", "circle")
        .with("geom", "point")
        // Gene tracks.
        .with("feature_label_spacing", 2.0 * MM)
        .with("feature_label_font", "Sans 6")
        .with("feature_label_color", "black")
        .with("feature_height", 3.0 * MM)
        .with("feature_fill", "darkblue")
}
