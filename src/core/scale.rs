use crate::core::frame::Span;
use crate::error::{GvizError, GvizResult};

/// One-dimensional linear mapping from a data domain onto a device range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: Span,
    range: Span,
}

impl LinearScale {
    pub fn new(domain: Span, range: Span) -> GvizResult<Self> {
        domain.validate()?;
        if !range.start.is_finite() || !range.end.is_finite() {
            return Err(GvizError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self { domain, range })
    }

    #[must_use]
    pub fn domain(self) -> Span {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> Span {
        self.range
    }

    pub fn map(self, value: f64) -> GvizResult<f64> {
        if !value.is_finite() {
            return Err(GvizError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain.start) / self.domain.length();
        Ok(self.range.start + normalized * self.range.length())
    }

    pub fn invert(self, device: f64) -> GvizResult<f64> {
        if !device.is_finite() {
            return Err(GvizError::InvalidData(
                "device coordinate must be finite".to_owned(),
            ));
        }
        if self.range.length() == 0.0 {
            return Err(GvizError::InvalidData(
                "cannot invert a scale with an empty range".to_owned(),
            ));
        }

        let normalized = (device - self.range.start) / self.range.length();
        Ok(self.domain.start + normalized * self.domain.length())
    }

    /// Device units per domain unit (signed).
    #[must_use]
    pub fn resolution(self) -> f64 {
        self.range.length() / self.domain.length()
    }
}

/// Domain of a data axis fitted to `values` with a relative padding.
///
/// Flat data gets `±0.5` so the axis never collapses; empty input yields `None`.
#[must_use]
pub fn fit_domain<I: IntoIterator<Item = f64>>(values: I, padding_ratio: f64) -> Option<Span> {
    let (min, max) = values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, value| match acc {
            Some((min, max)) => Some((min.min(value), max.max(value))),
            None => Some((value, value)),
        })?;

    if min == max {
        return Some(Span::new(min - 0.5, max + 0.5));
    }
    let pad = (max - min) * padding_ratio.max(0.0);
    Some(Span::new(min - pad, max + pad))
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, fit_domain};
    use crate::core::frame::Span;

    #[test]
    fn scale_round_trip_within_tolerance() {
        let scale = LinearScale::new(Span::new(10.0, 110.0), Span::new(0.0, 1000.0))
            .expect("valid scale");
        let px = scale.map(42.5).expect("map");
        let recovered = scale.invert(px).expect("invert");
        assert!((recovered - 42.5).abs() <= 1e-9);
        assert_eq!(scale.resolution(), 10.0);
    }

    #[test]
    fn reversed_range_flips_axis() {
        let scale =
            LinearScale::new(Span::new(0.0, 1.0), Span::new(200.0, 0.0)).expect("valid scale");
        assert_eq!(scale.map(0.0).expect("bottom"), 200.0);
        assert_eq!(scale.map(1.0).expect("top"), 0.0);
    }

    #[test]
    fn fit_domain_pads_and_handles_flat_data() {
        let span = fit_domain([1.0, 3.0, f64::NAN], 0.05).expect("fit");
        assert!((span.start - 0.9).abs() < 1e-12);
        assert!((span.end - 3.1).abs() < 1e-12);

        let flat = fit_domain([42.0, 42.0], 0.05).expect("flat");
        assert_eq!((flat.start, flat.end), (41.5, 42.5));
        assert!(fit_domain(Vec::<f64>::new(), 0.05).is_none());
    }
}
