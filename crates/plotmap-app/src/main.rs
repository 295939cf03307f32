//! Command-line entry point.
//!
//! `plotmap <boundaries.json> [output.png] [config.json]`

use plotmap_app::{App, AppConfig, AppResult};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "usage: plotmap <boundaries.json> [output.png] [config.json]";

fn run(boundaries: &Path, output: Option<PathBuf>, config: Option<PathBuf>) -> AppResult<()> {
    let config = match config {
        Some(path) => AppConfig::load(&path)?,
        None => AppConfig::default(),
    };
    let mut app = App::new(config);
    app.load_boundaries(boundaries)?;
    app.replay_config_events();

    let json = serde_json::to_string_pretty(app.measurements())?;
    println!("{}", json);
    log::info!("{}", app.summary());

    if let Some(output) = output {
        app.export_png(&output)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting PlotMap");

    let mut args = std::env::args_os().skip(1);
    let Some(boundaries) = args.next().map(PathBuf::from) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };
    let output = args.next().map(PathBuf::from);
    let config = args.next().map(PathBuf::from);

    match run(&boundaries, output, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("plotmap: {}", e);
            ExitCode::FAILURE
        }
    }
}
