//! Scene export command line tool
//!
//! Loads a host scene snapshot (`.ron` or `.toml`), exports it as a scene
//! description and reports the geometry files and diagnostics.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use scene_export::foundation::logging;
use scene_export::prelude::*;

const DEFAULT_RENDER_DIR: &str = "render";
const DEFAULT_SETTINGS_NODE: &str = "renderSettings";

struct ExportArgs {
    snapshot: String,
    output: PathBuf,
    render_dir: PathBuf,
    settings_node: String,
    config: Option<String>,
    frame: Option<f64>,
    strict: bool,
}

fn parse_args() -> Result<ExportArgs> {
    let matches = Command::new("scene_export")
        .about("Exports a host scene snapshot as a renderer scene description")
        .arg(
            Arg::new("snapshot")
                .value_name("SNAPSHOT")
                .help("Scene snapshot to export (.ron or .toml)")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Scene file to write")
                .required(true),
        )
        .arg(
            Arg::new("render-dir")
                .short('d')
                .long("render-dir")
                .value_name("DIR")
                .help("Directory for geometry files")
                .default_value(DEFAULT_RENDER_DIR),
        )
        .arg(
            Arg::new("settings")
                .short('s')
                .long("settings")
                .value_name("NODE")
                .help("Render settings node in the snapshot")
                .default_value(DEFAULT_SETTINGS_NODE),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Export configuration (.ron or .toml)"),
        )
        .arg(
            Arg::new("frame")
                .short('f')
                .long("frame")
                .value_name("FRAME")
                .help("Frame to export instead of the snapshot's current frame"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Exit with an error when any diagnostic was recorded")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let frame = matches
        .get_one::<String>("frame")
        .map(|frame| frame.parse::<f64>().context("Invalid frame number"))
        .transpose()?;

    Ok(ExportArgs {
        snapshot: matches
            .get_one::<String>("snapshot")
            .cloned()
            .context("Missing snapshot path")?,
        output: matches
            .get_one::<String>("output")
            .map(PathBuf::from)
            .context("Missing output path")?,
        render_dir: matches
            .get_one::<String>("render-dir")
            .map_or_else(|| PathBuf::from(DEFAULT_RENDER_DIR), PathBuf::from),
        settings_node: matches
            .get_one::<String>("settings")
            .cloned()
            .unwrap_or_else(|| DEFAULT_SETTINGS_NODE.to_string()),
        config: matches.get_one::<String>("config").cloned(),
        frame,
        strict: matches.get_flag("strict"),
    })
}

fn main() -> Result<()> {
    logging::init_with_default("info");
    let args = parse_args()?;

    let host = SceneSnapshot::load_from_file(&args.snapshot)
        .with_context(|| format!("Failed to load scene snapshot {}", args.snapshot))?;
    let config = match &args.config {
        Some(path) => ExportConfig::load_from_file(path)
            .with_context(|| format!("Failed to load export configuration {path}"))?,
        None => ExportConfig::default(),
    };
    log::info!(
        "Loaded {} nodes and {} connections from {}",
        host.nodes.len(),
        host.connections.len(),
        args.snapshot
    );

    let mut exporter = SceneExporter::new(&host, &config);
    if let Some(frame) = args.frame {
        exporter = exporter.with_frame(frame);
    }

    let report = exporter
        .export(&mut PlannedGeometry, &args.output, &args.render_dir, &args.settings_node)
        .with_context(|| format!("Failed to export {}", args.output.display()))?;

    for path in &report.geometry_files {
        println!("{}", path.display());
    }

    if !report.is_clean() {
        eprintln!("{} diagnostics:", report.diagnostics.len());
        for diagnostic in &report.diagnostics {
            eprintln!("  {diagnostic}");
        }
        if args.strict {
            anyhow::bail!("Export recorded {} diagnostics", report.diagnostics.len());
        }
    }
    Ok(())
}
