use gviz::FigureConfig;
use gviz::api::TrackConfig;
use gviz::render::NullRenderer;

const GTF_LINE: &str =
    "chr7\tsrc\tgene\t2000\t6000\t.\t-\t.\tgene_id \"G7\"; gene_name \"SEVEN\";\n";

#[test]
fn figure_config_file_renders_every_track() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gtf = dir.path().join("genes.gtf");
    std::fs::write(&gtf, GTF_LINE).expect("write gtf");

    let config_path = dir.path().join("figure.json");
    let json = serde_json::json!({
        "output": "figure.pdf",
        "xmin": 1000,
        "xmax": 9000,
        "params": { "width": "16cm", "margin_left": "2cm" },
        "tracks": [
            { "type": "axis", "height": "8mm" },
            {
                "type": "data",
                "title": "Depth",
                "x": [1500, 2500, 3500],
                "layers": [
                    { "y": [4, 8, 2], "geom": "col", "color": "#4682b4" },
                    { "y": [3, 6, 1], "geom": "line", "linetype": "dot" }
                ]
            },
            { "type": "gene", "chrom": "chr7", "start": 1000, "end": 9000,
              "gtf": gtf.to_string_lossy() }
        ]
    });
    std::fs::write(&config_path, json.to_string()).expect("write config");

    let config = FigureConfig::from_path(&config_path).expect("load config");
    assert_eq!(config.output.as_deref(), Some(std::path::Path::new("figure.pdf")));
    assert!(matches!(config.tracks[0], TrackConfig::Axis { .. }));

    let (plot, tracks) = config.into_plot().expect("plot");
    let mut renderer = NullRenderer::default();
    plot.render(&tracks, &mut renderer).expect("render");

    // Three bars plus one exon-less gene body.
    assert_eq!(renderer.last_rect_count, 4);
    assert_eq!(renderer.last_polyline_count, 1);
    assert_eq!(renderer.last_marker_count, 0);

    let frame = plot.build_render_frame(&tracks).expect("frame");
    assert!(frame.texts().any(|text| text.text == "SEVEN"));
    assert!(frame.texts().any(|text| text.text == "Depth"));
    assert!((frame.width - 16.0 * gviz::core::CM).abs() < 1e-9);
}

#[test]
fn figure_config_survives_a_json_round_trip() {
    let config = FigureConfig::from_json_str(
        r#"{ "xmin": 0, "xmax": 10, "tracks": [ { "type": "axis", "axis_color": "red" } ] }"#,
    )
    .expect("parse");
    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"type\": \"axis\""));
    assert_eq!(FigureConfig::from_json_str(&json).expect("reparse"), config);
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = FigureConfig::from_path(dir.path().join("absent.json")).expect_err("missing");
    assert!(matches!(err, gviz::GvizError::Io(_)));
}
