pub const AXIS_X_TARGET_SPACING_PT: f64 = 72.0;
pub const AXIS_Y_TARGET_SPACING_PT: f64 = 18.0;

const MAX_DECIMALS: i32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    pub step: f64,
    pub values: Vec<f64>,
}

pub fn tick_target_count(
    axis_span_pt: f64,
    target_spacing_pt: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_pt.is_finite() || axis_span_pt <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_pt.is_finite() || target_spacing_pt <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_pt / target_spacing_pt).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Ticks on a 1/2/5 x 10^k grid inside `[start, end]` (either order).
#[must_use]
pub fn nice_ticks(start: f64, end: f64, target_count: usize) -> Ticks {
    let (low, high) = (start.min(end), start.max(end));
    let span = high - low;
    if !span.is_finite() || span <= 0.0 || target_count == 0 {
        return Ticks {
            step: 0.0,
            values: Vec::new(),
        };
    }

    let step = nice_step(span / target_count as f64);
    let first = (low / step).ceil() * step;
    let tolerance = step * 1e-9;

    let mut values = Vec::with_capacity(target_count + 2);
    let mut index = 0.0;
    loop {
        let value = first + index * step;
        if value > high + tolerance {
            break;
        }
        // Avoid printing `-0`.
        values.push(if value.abs() < tolerance { 0.0 } else { value });
        index += 1.0;
    }

    Ticks { step, values }
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn step_exponent(step: f64) -> i32 {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    (step.log10() + 1e-9).floor() as i32
}

/// Formats a base-pair coordinate as `bp`, `kb` or `Mb` with as many decimals
/// as the tick step needs, e.g. `31.42 Mb` for a 20 kb step.
#[must_use]
pub fn format_genomic_position(value: f64, step: f64) -> String {
    let magnitude = value.abs().max(step.abs());
    let (divisor, unit_exponent, unit) = if magnitude >= 1e6 {
        (1e6, 6, "Mb")
    } else if magnitude >= 1e3 {
        (1e3, 3, "kb")
    } else {
        (1.0, 0, "bp")
    };

    let decimals = (unit_exponent - step_exponent(step)).clamp(0, MAX_DECIMALS) as usize;
    format!("{:.*} {unit}", decimals, value / divisor)
}

/// Formats a y-axis value with decimals derived from the tick step.
#[must_use]
pub fn format_number(value: f64, step: f64) -> String {
    let decimals = (-step_exponent(step)).clamp(0, MAX_DECIMALS) as usize;
    let formatted = format!("{value:.decimals$}");
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_owned()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::{format_genomic_position, format_number, nice_ticks, tick_target_count};

    #[test]
    fn target_count_is_clamped() {
        assert_eq!(tick_target_count(500.0, 72.0, 2, 12), 7);
        assert_eq!(tick_target_count(0.0, 72.0, 2, 12), 2);
        assert_eq!(tick_target_count(1e6, 72.0, 2, 12), 12);
    }

    #[test]
    fn nice_ticks_land_on_round_values() {
        let ticks = nice_ticks(31_400_000.0, 31_550_229.0, 7);
        assert_eq!(ticks.step, 50_000.0);
        assert_eq!(
            ticks.values,
            vec![31_400_000.0, 31_450_000.0, 31_500_000.0, 31_550_000.0]
        );

        let unit = nice_ticks(-0.05, 1.05, 5);
        assert_eq!(unit.step, 0.5);
        assert_eq!(unit.values, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn nice_ticks_handle_reversed_and_empty_ranges() {
        assert_eq!(nice_ticks(10.0, 0.0, 5).values, nice_ticks(0.0, 10.0, 5).values);
        assert!(nice_ticks(3.0, 3.0, 5).values.is_empty());
    }

    #[test]
    fn genomic_labels_pick_unit_and_precision() {
        assert_eq!(format_genomic_position(31_420_000.0, 20_000.0), "31.42 Mb");
        assert_eq!(format_genomic_position(31_000_000.0, 1_000_000.0), "31 Mb");
        assert_eq!(format_genomic_position(12_500.0, 500.0), "12.5 kb");
        assert_eq!(format_genomic_position(250.0, 50.0), "250 bp");
    }

    #[test]
    fn number_labels_follow_step() {
        assert_eq!(format_number(0.5, 0.5), "0.5");
        assert_eq!(format_number(20.0, 5.0), "20");
        assert_eq!(format_number(-0.0001, 0.1), "0.0");
    }
}
