use approx::assert_relative_eq;
use gviz::core::{
    CM, INCH, LinearScale, MM, Span, fit_domain, format_genomic_position, format_number,
    nice_ticks, parse_length, tick_target_count,
};
use proptest::prelude::*;

#[test]
fn units_are_expressed_in_points() {
    assert_relative_eq!(INCH, 72.0);
    assert_relative_eq!(CM, 72.0 / 2.54);
    assert_relative_eq!(10.0 * MM, CM, epsilon = 1e-12);
    assert_relative_eq!(parse_length("2cm").expect("cm"), 2.0 * CM, epsilon = 1e-12);
    assert_relative_eq!(parse_length(" 5 mm ").expect("mm"), 5.0 * MM, epsilon = 1e-12);
}

#[test]
fn reversed_scale_maps_and_inverts() {
    let scale = LinearScale::new(Span::new(0.0, 10.0), Span::new(200.0, 100.0)).expect("scale");
    assert_relative_eq!(scale.map(0.0).expect("map"), 200.0);
    assert_relative_eq!(scale.map(2.5).expect("map"), 175.0);
    assert_relative_eq!(scale.invert(150.0).expect("invert"), 5.0);
    assert!(LinearScale::new(Span::new(1.0, 1.0), Span::new(0.0, 1.0)).is_err());
}

#[test]
fn fitted_domains_pad_or_widen_flat_data() {
    let fitted = fit_domain([2.0, f64::NAN, 4.0], 0.05).expect("values");
    assert_relative_eq!(fitted.start, 1.9, epsilon = 1e-12);
    assert_relative_eq!(fitted.end, 4.1, epsilon = 1e-12);

    let flat = fit_domain([3.0, 3.0], 0.05).expect("values");
    assert_eq!((flat.start, flat.end), (2.5, 3.5));
    assert!(fit_domain([f64::INFINITY], 0.05).is_none());
}

#[test]
fn genomic_labels_pick_units_by_magnitude() {
    assert_eq!(format_genomic_position(500.0, 100.0), "500 bp");
    assert_eq!(format_genomic_position(12_000.0, 2_000.0), "12 kb");
    assert_eq!(format_genomic_position(12_500.0, 500.0), "12.5 kb");
    assert_eq!(format_genomic_position(31_420_000.0, 20_000.0), "31.42 Mb");
    assert_eq!(format_number(-0.0001, 0.5), "0.0");
    assert_eq!(format_number(2.0, 1.0), "2");
}

#[test]
fn reversed_bounds_give_the_same_ticks() {
    assert_eq!(nice_ticks(0.0, 10.0, 5), nice_ticks(10.0, 0.0, 5));
    assert!(nice_ticks(1.0, 1.0, 5).values.is_empty());
    assert_eq!(tick_target_count(f64::NAN, 72.0, 2, 12), 2);
}

proptest! {
    #[test]
    fn ticks_stay_inside_and_are_evenly_spaced(
        start in -1.0e7f64..1.0e7,
        span in 1.0e-3f64..1.0e7,
        target in 3usize..12,
    ) {
        let end = start + span;
        let ticks = nice_ticks(start, end, target);
        let tolerance = ticks.step * 1e-6 + start.abs().max(end.abs()) * 1e-12;

        prop_assert!(ticks.step > 0.0);
        prop_assert!(!ticks.values.is_empty());
        prop_assert!(ticks.values.len() <= 2 * target + 2);
        for value in &ticks.values {
            prop_assert!(*value >= start - tolerance && *value <= end + tolerance);
        }
        for pair in ticks.values.windows(2) {
            prop_assert!(((pair[1] - pair[0]) - ticks.step).abs() <= tolerance);
        }
    }
}
