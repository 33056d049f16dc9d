use approx::assert_relative_eq;
use gviz::api::TrackPlot;
use gviz::core::{CM, Color, MM, Params};
use gviz::render::{LineDash, MarkerShape, RenderFrame};
use gviz::{DataTrack, GvizError, Track};

const PANEL_LEFT: f64 = 3.0 * CM;
const PANEL_WIDTH: f64 = 16.0 * CM;
const PANEL_TOP: f64 = 2.0 * MM;
const PANEL_BOTTOM: f64 = 2.0 * MM + 2.0 * CM;

fn draw(track: DataTrack) -> Result<RenderFrame, GvizError> {
    let plot = TrackPlot::new(0.0, 100.0)?;
    plot.build_render_frame(&[Track::from(track)])
}

fn device_x(x: f64) -> f64 {
    PANEL_LEFT + x / 100.0 * PANEL_WIDTH
}

fn device_y(y: f64, ymin: f64, ymax: f64) -> f64 {
    PANEL_BOTTOM - (y - ymin) / (ymax - ymin) * (PANEL_BOTTOM - PANEL_TOP)
}

#[test]
fn points_outside_the_domain_or_non_finite_are_skipped() {
    let frame = draw(
        DataTrack::new()
            .with_x(vec![10.0, 20.0, 150.0, 30.0])
            .with_y(vec![1.0, 2.0, 3.0, f64::NAN]),
    )
    .expect("frame");

    let markers: Vec<_> = frame.markers().collect();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].shape, MarkerShape::Circle);
    assert_relative_eq!(markers[0].radius, 1.5);
    assert_relative_eq!(markers[0].x, device_x(10.0), epsilon = 1e-9);
    // Autoscaled to the visible values 1..2 padded by 5%.
    assert_relative_eq!(markers[0].y, device_y(1.0, 0.95, 2.05), epsilon = 1e-9);
    assert_relative_eq!(markers[1].y, device_y(2.0, 0.95, 2.05), epsilon = 1e-9);
}

#[test]
fn line_geom_is_clipped_at_the_panel_border() {
    let frame = draw(
        DataTrack::new()
            .with_x(vec![0.0, 50.0, 100.0])
            .with_y(vec![0.0, 10.0, 0.0])
            .with("geom", "line")
            .with("linetype", "dash")
            .with("ymax", 5.0),
    )
    .expect("frame");

    let polylines: Vec<_> = frame.polylines().collect();
    assert_eq!(polylines.len(), 2);
    assert_eq!(polylines[0].dash, LineDash::Dashed);
    assert_eq!(polylines[0].points.len(), 2);

    let (exit_x, exit_y) = polylines[0].points[1];
    assert_relative_eq!(exit_x, device_x(25.0), epsilon = 1e-6);
    assert_relative_eq!(exit_y, PANEL_TOP, epsilon = 1e-6);
    let (enter_x, _) = polylines[1].points[0];
    assert_relative_eq!(enter_x, device_x(75.0), epsilon = 1e-6);
    assert_relative_eq!(polylines[1].points[1].0, device_x(100.0), epsilon = 1e-6);
}

#[test]
fn line_geom_breaks_at_missing_values() {
    let frame = draw(
        DataTrack::new()
            .with_x(vec![0.0, 10.0, 20.0, 30.0, 40.0])
            .with_y(vec![1.0, 2.0, f64::NAN, 2.0, 1.0])
            .with("geom", "line"),
    )
    .expect("frame");
    let runs: Vec<usize> = frame.polylines().map(|line| line.points.len()).collect();
    assert_eq!(runs, vec![2, 2]);
}

#[test]
fn col_geom_draws_bars_from_the_baseline() {
    let frame = draw(
        DataTrack::new()
            .with_x(vec![10.0, 20.0])
            .with_y(vec![3.0, -1.0])
            .with("geom", "col")
            .with("size", 4.0)
            .with("color", "steelblue")
            .with("base_line_y", 0.0),
    )
    .expect("frame");

    // Domain covers the data and the baseline: -1..3 padded by 5%.
    let (ymin, ymax) = (-1.2, 3.2);
    let baseline = frame.lines().next().expect("baseline first");
    assert_relative_eq!(baseline.y1, device_y(0.0, ymin, ymax), epsilon = 1e-9);
    assert_relative_eq!(baseline.x1, PANEL_LEFT, epsilon = 1e-9);
    assert_relative_eq!(baseline.x2, PANEL_LEFT + PANEL_WIDTH, epsilon = 1e-9);

    let rects: Vec<_> = frame.rects().collect();
    assert_eq!(rects.len(), 2);
    assert_eq!(rects[0].fill_color, Color::from_rgb8(70, 130, 180));
    assert_relative_eq!(rects[0].width, 4.0, epsilon = 1e-9);
    assert_relative_eq!(rects[0].x, device_x(10.0) - 2.0, epsilon = 1e-9);
    assert_relative_eq!(rects[0].y, device_y(3.0, ymin, ymax), epsilon = 1e-9);
    assert_relative_eq!(
        rects[0].height,
        device_y(0.0, ymin, ymax) - device_y(3.0, ymin, ymax),
        epsilon = 1e-9
    );
    // Negative bars hang below the baseline.
    assert_relative_eq!(rects[1].y, device_y(0.0, ymin, ymax), epsilon = 1e-9);
}

#[test]
fn col_bars_at_the_domain_edges_stay_inside_the_panel() {
    let frame = draw(
        DataTrack::new()
            .with_x(vec![0.0, 100.0])
            .with_y(vec![1.0, 1.0])
            .with("geom", "col")
            .with("size", 10.0)
            .with("ymin", 0.0)
            .with("ymax", 2.0),
    )
    .expect("frame");

    let rects: Vec<_> = frame.rects().collect();
    assert_eq!(rects.len(), 2);
    assert_relative_eq!(rects[0].x, PANEL_LEFT, epsilon = 1e-9);
    assert_relative_eq!(rects[0].width, 5.0, epsilon = 1e-9);
    assert_relative_eq!(rects[1].x, device_x(100.0) - 5.0, epsilon = 1e-9);
    assert_relative_eq!(
        rects[1].x + rects[1].width,
        PANEL_LEFT + PANEL_WIDTH,
        epsilon = 1e-9
    );
}

fn resolved_y_domain(track: DataTrack) -> (f64, f64) {
    let figure = TrackPlot::new(0.0, 100.0)
        .expect("plot")
        .draw(&[track.into()])
        .expect("draw");
    let tree = figure.layout.tree();
    let panel = tree
        .children(figure.layout.slots()[0].frame)
        .expect("track")[0];
    let coords = tree.frame(panel).expect("panel").coords;
    (coords.y.start, coords.y.end)
}

#[test]
fn a_single_fixed_y_bound_autoscales_the_other_side() {
    let base = || DataTrack::new().with_x(vec![10.0, 20.0, 30.0]);

    // Data entirely above a fixed ymax: nothing to fit below it.
    let (ymin, ymax) = resolved_y_domain(base().with_y(vec![1.0, 2.0, 2.0]).with("ymax", 0.5));
    assert_relative_eq!(ymin, -0.5, epsilon = 1e-12);
    assert_relative_eq!(ymax, 0.5, epsilon = 1e-12);

    // Only values above a fixed ymin feed the fitted ymax.
    let (ymin, ymax) = resolved_y_domain(base().with_y(vec![-5.0, 2.0, 4.0]).with("ymin", 0.0));
    assert_relative_eq!(ymin, 0.0, epsilon = 1e-12);
    assert_relative_eq!(ymax, 4.1, epsilon = 1e-12);

    let (ymin, ymax) = resolved_y_domain(base().with_y(vec![-5.0, -6.0, -7.0]).with("ymin", 0.0));
    assert_relative_eq!(ymin, 0.0, epsilon = 1e-12);
    assert_relative_eq!(ymax, 1.0, epsilon = 1e-12);
}

#[test]
fn alpha_scales_color_and_fill() {
    let frame = draw(
        DataTrack::new()
            .with_x(vec![50.0])
            .with_y(vec![1.0])
            .with("color", "red")
            .with("fill", "#00ff00")
            .with("shape", "square")
            .with("alpha", 0.5),
    )
    .expect("frame");

    let marker = frame.markers().next().expect("marker");
    assert_eq!(marker.shape, MarkerShape::Square);
    assert_relative_eq!(marker.stroke_color.alpha, 0.5);
    assert_relative_eq!(marker.stroke_color.red, 1.0);
    assert_relative_eq!(marker.fill_color.alpha, 0.5);
    assert_relative_eq!(marker.fill_color.green, 1.0);
}

#[test]
fn layers_inherit_shared_x_from_the_track() {
    let track = DataTrack::new()
        .with_x(vec![10.0, 20.0, 30.0])
        .with("ymin", 0.0)
        .with("ymax", 4.0)
        .with_layer(Params::new().with("y", vec![1.0, 2.0, 3.0]))
        .with_layer(
            Params::new()
                .with("y", vec![3.0, 2.0, 1.0])
                .with("geom", "line")
                .with("color", "blue"),
        );
    let plot = TrackPlot::new(0.0, 100.0).expect("plot");
    let figure = plot.draw(&[track.into()]).expect("draw");

    assert_eq!(figure.frame.markers().count(), 3);
    let line = figure.frame.polylines().next().expect("line layer");
    assert_eq!(line.points.len(), 3);
    assert_eq!(line.color, Color::from_rgb8(0, 0, 255));
    assert!(
        figure
            .frame
            .markers()
            .all(|marker| marker.stroke_color == Color::BLACK)
    );

    let tree = figure.layout.tree();
    let track_frame = figure.layout.slots()[0].frame;
    let panel = tree.frame(track_frame).expect("track").children()[0];
    let layers = tree.frame(panel).expect("panel").children();
    let names: Vec<&str> = layers
        .iter()
        .map(|id| tree.frame(*id).expect("layer").name.as_str())
        .collect();
    assert_eq!(names, vec!["layer[0]", "layer[1]"]);

    let (origin, _) = tree.lookup_origin(layers[1], "x").expect("x inherited");
    assert_eq!(origin.name, "track[0]:data");
    let (origin, _) = tree.lookup_origin(layers[1], "geom").expect("geom set");
    assert_eq!(origin.name, "layer[1]");
}

#[test]
fn invalid_layer_data_is_reported() {
    let err = draw(DataTrack::new().with_x(vec![1.0, 2.0]).with_y(vec![1.0]))
        .expect_err("length mismatch");
    assert!(matches!(err, GvizError::InvalidData(_)));

    let err = draw(DataTrack::new().with_x(vec![1.0])).expect_err("missing y");
    assert!(matches!(err, GvizError::MissingParameter { ref key, .. } if key == "y"));

    let err = draw(
        DataTrack::new()
            .with_x(vec![1.0])
            .with_y(vec![1.0])
            .with("geom", "area"),
    )
    .expect_err("unknown geom");
    assert!(matches!(err, GvizError::InvalidParameter { ref key, .. } if key == "geom"));

    let err = draw(
        DataTrack::new()
            .with_x(vec![1.0])
            .with_y(vec![1.0])
            .with("alpha", 1.5),
    )
    .expect_err("alpha out of range");
    assert!(matches!(err, GvizError::InvalidParameter { ref key, .. } if key == "alpha"));

    let err = draw(
        DataTrack::new()
            .with_x(vec![1.0])
            .with_y(vec![1.0])
            .with("ymin", 5.0)
            .with("ymax", 1.0),
    )
    .expect_err("reversed y range");
    assert!(matches!(err, GvizError::InvalidRange { .. }));
}

#[test]
fn empty_data_falls_back_to_a_unit_y_range() {
    let frame = draw(
        DataTrack::new()
            .with_x(Vec::<f64>::new())
            .with_y(Vec::<f64>::new()),
    )
    .expect("frame");
    assert_eq!(frame.markers().count(), 0);
    assert!(frame.texts().any(|text| text.text == "1.0"));
}
