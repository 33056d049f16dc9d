use std::path::PathBuf;

use gviz::FigureConfig;
use gviz::render::CairoPdfRenderer;

#[derive(Debug)]
struct CliArgs {
    config_path: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
}

fn main() {
    let result = parse_args().and_then(|args| {
        if !args.verbose {
            let _ = gviz::telemetry::init_default_tracing();
        } else if !gviz::telemetry::init_tracing("gviz=debug") {
            eprintln!("warning: --verbose could not install a tracing subscriber");
        }
        run(args)
    });
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), String> {
    let config = FigureConfig::from_path(&args.config_path).map_err(|err| {
        format!(
            "failed to load figure `{}`: {err}",
            args.config_path.display()
        )
    })?;

    let output = args
        .output
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| args.config_path.with_extension("pdf"));
    let (plot, tracks) = config.into_plot().map_err(|err| err.to_string())?;

    let mut renderer = CairoPdfRenderer::new(&output).map_err(|err| err.to_string())?;
    plot.render(&tracks, &mut renderer)
        .map_err(|err| format!("failed to plot `{}`: {err}", output.display()))?;

    let stats = renderer.last_stats();
    println!(
        "wrote {} ({} tracks, {} primitives)",
        output.display(),
        tracks.len(),
        stats.lines_drawn
            + stats.polylines_drawn
            + stats.rects_drawn
            + stats.markers_drawn
            + stats.texts_drawn
    );
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut positional = Vec::new();
    let mut verbose = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                println!("{}", usage_message());
                std::process::exit(0);
            }
            "--verbose" | "-v" => verbose = true,
            flag if flag.starts_with('-') => {
                return Err(format!("unknown argument `{arg}`\n\n{}", usage_message()));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let config_path = positional
        .next()
        .ok_or_else(|| format!("missing figure config\n\n{}", usage_message()))?;
    let output = positional.next();
    if positional.next().is_some() {
        return Err(format!("too many arguments\n\n{}", usage_message()));
    }
    Ok(CliArgs {
        config_path,
        output,
        verbose,
    })
}

fn usage_message() -> &'static str {
    "usage: gviz-plot [--verbose] <figure.json> [output.pdf]\n\
     \n\
     Renders the tracks described in <figure.json> to a PDF. The output path\n\
     defaults to the config's `output` field, then to <figure>.pdf.\n\
     --verbose logs layout and drawing at debug level (GVIZ_LOG overrides)."
}
