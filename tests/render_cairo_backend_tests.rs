#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use gviz::api::TrackPlot;
use gviz::core::{Color, Params};
use gviz::render::{CairoContextRenderer, CairoPdfRenderer};
use gviz::{DataTrack, GenomicAxis, GvizError, Track, plot_tracks};

fn tracks() -> Vec<Track> {
    vec![
        GenomicAxis::new().into(),
        DataTrack::new()
            .with_x(vec![10.0, 40.0, 70.0])
            .with_y(vec![1.0, 3.0, 2.0])
            .with("title", "Counts")
            .into(),
    ]
}

#[test]
fn pdf_renderer_rejects_empty_path() {
    let err = CairoPdfRenderer::new("").expect_err("empty path must fail");
    assert!(matches!(err, GvizError::InvalidData(_)));
}

#[test]
fn pdf_renderer_writes_a_pdf_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("figure.pdf");

    let plot = TrackPlot::new(0.0, 100.0).expect("plot");
    let mut renderer = CairoPdfRenderer::new(&path).expect("renderer");
    renderer
        .set_background(Some(Color::WHITE))
        .expect("background");
    plot.render(&tracks(), &mut renderer).expect("render");

    let stats = renderer.last_stats();
    assert_eq!(stats.markers_drawn, 3);
    assert!(stats.texts_drawn >= 4);

    let bytes = std::fs::read(&path).expect("pdf written");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn plot_tracks_is_a_one_call_pdf_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("one-call.pdf");

    plot_tracks(
        &tracks(),
        &path,
        0.0,
        100.0,
        Params::new().with("width", "12cm"),
    )
    .expect("plot");
    assert!(path.is_file());

    let err = plot_tracks(&[], &path, 0.0, 100.0, Params::new()).expect_err("no tracks");
    assert!(matches!(err, GvizError::EmptyTrackList));
}

#[test]
fn pdf_renderer_can_draw_on_external_context() {
    let plot = TrackPlot::new(0.0, 100.0).expect("plot");
    let frame = plot.build_render_frame(&tracks()).expect("frame");

    let surface = ImageSurface::create(
        Format::ARgb32,
        frame.width.ceil() as i32,
        frame.height.ceil() as i32,
    )
    .expect("surface");
    let context = Context::new(&surface).expect("context");

    let mut renderer = CairoPdfRenderer::new("unused.pdf").expect("renderer");
    renderer
        .render_on_cairo_context(&context, &frame)
        .expect("render on context");
    assert_eq!(renderer.last_stats().markers_drawn, 3);
    assert!(!std::path::Path::new("unused.pdf").exists());
    assert_eq!(renderer.backend_name(), "cairo-pdf+pango+pangocairo");
}
