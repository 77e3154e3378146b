//! livemark - command line entry point
//!
//! Prints the live-preview decorations of a markdown file as they would be
//! applied with the cursor at a given offset.
//!
//! ```text
//! livemark <file.md> [--cursor <offset>] [--json] [--config <path>]
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use env_logger::Env;
use log::{error, info};

use livemark::config::{load_config, load_config_from_path};
use livemark::editor::{EditorHost, EditorState};
use livemark::error::{Error, Result};
use livemark::{Decoration, Widget};

const APP_NAME: &str = "livemark";
const USAGE: &str = "usage: livemark <file.md> [--cursor <offset>] [--json] [--config <path>]";

/// How long to wait for math renders before printing.
const MATH_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct Args {
    file: PathBuf,
    cursor: usize,
    json: bool,
    config: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut file = None;
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--cursor" => {
                let value = args
                    .next()
                    .ok_or_else(|| Error::Application("--cursor needs an offset".to_string()))?;
                parsed.cursor = value
                    .parse()
                    .map_err(|_| Error::Application(format!("invalid cursor offset '{}'", value)))?;
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| Error::Application("--config needs a path".to_string()))?;
                parsed.config = Some(PathBuf::from(value));
            }
            other if other.starts_with("--") => {
                return Err(Error::Application(format!("unknown option '{}'", other)));
            }
            other => file = Some(PathBuf::from(other)),
        }
    }
    parsed.file = file.ok_or_else(|| Error::Application(USAGE.to_string()))?;
    Ok(parsed)
}

fn run(args: Args) -> Result<()> {
    let settings = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => load_config(),
    };
    let text = fs::read_to_string(&args.file).map_err(|source| Error::FileRead {
        path: args.file.clone(),
        source,
    })?;

    let mut state = EditorState::with_settings(text, settings);
    state.set_cursor(args.cursor);
    let mut decorations = state.decorations();
    info!(
        "{} decoration(s) for {}",
        decorations.len(),
        args.file.display()
    );

    if decorations
        .iter()
        .any(|d| matches!(d.widget_ref(), Some(Widget::Math { .. })))
    {
        state.services().math.wait(MATH_TIMEOUT);
        decorations = state.decorations();
    }

    if args.json {
        let json = serde_json::to_string_pretty(&decorations)?;
        println!("{}", json);
        return Ok(());
    }
    for decoration in &decorations {
        match decoration {
            Decoration::Replace {
                from,
                widget: Some(Widget::Math { .. }),
                ..
            } => match state.math_view(*from) {
                Some(view) => println!("{} = {}", decoration, view.text()),
                None => println!("{}", decoration),
            },
            _ => println!("{}", decoration),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    info!("Starting {} on {}", APP_NAME, args.file.display());
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
