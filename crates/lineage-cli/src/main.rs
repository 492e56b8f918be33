mod import;

use futures::executor::block_on;
use lineage::render::raster::{RasterError, RasterOptions};
use lineage::render::{HeadlessError, TreeRenderer};
use lineage::{ConfigDocument, FsFetcher, TreeConfig};
use serde_json::Value;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Config(lineage::Error),
    Load(lineage::Error),
    Render(lineage_render::Error),
    Raster(RasterError),
    Import(import::ImportError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Load(err) => write!(f, "failed to load tree data: {err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Import(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<lineage_render::Error> for CliError {
    fn from(value: lineage_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value.into())
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        match value {
            HeadlessError::Load(err) => Self::Load(err),
            HeadlessError::Render(err) => Self::Render(err),
        }
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        match value {
            RasterError::Headless(err) => err.into(),
            other => Self::Raster(other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    Import,
    Layout,
    #[default]
    Render,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RenderFormat {
    #[default]
    Svg,
    Html,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" => Ok(Self::Html),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    data_dir: Option<PathBuf>,
    csv: Option<PathBuf>,
    config: Option<PathBuf>,
    overrides: Vec<String>,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    diagram_id: Option<String>,
    title: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "lineage-cli\n\
\n\
USAGE:\n\
  lineage-cli import --csv <file> [--out <path>]\n\
  lineage-cli layout [--data <dir>] [--config <file>] [--set <key>=<value>]... [--width <w>] [--height <h>] [--pretty]\n\
  lineage-cli [render] [--format svg|html|png] [--data <dir>] [--config <file>] [--set <key>=<value>]... [--width <w>] [--height <h>] [--scale <n>] [--background <css-color>] [--id <diagram-id>] [--title <text>] [--out <path>]\n\
\n\
NOTES:\n\
  - --data is the directory holding family_data.json and the order/coordinate tables (default: .).\n\
  - --config reads a JSON5 file; --set applies dotted-path overrides on top (e.g. labels.strategy=ellipsis).\n\
  - import converts a spreadsheet CSV export to the record array (default: ./family_data.json).\n\
  - layout prints the computed layout JSON.\n\
  - render prints SVG/HTML to stdout by default; use --out to write a file.\n\
  - PNG output defaults to ./out.png.\n\
  - Log verbosity follows RUST_LOG (default: warn).\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "import" => args.command = Command::Import,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--data" => args.data_dir = Some(PathBuf::from(next_value(&mut it)?)),
            "--csv" => args.csv = Some(PathBuf::from(next_value(&mut it)?)),
            "--config" => args.config = Some(PathBuf::from(next_value(&mut it)?)),
            "--set" => {
                let kv = next_value(&mut it)?;
                if !kv.contains('=') {
                    return Err(CliError::Usage(usage()));
                }
                args.overrides.push(kv.clone());
            }
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = next_value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--width" => {
                args.width = Some(
                    next_value(&mut it)?
                        .parse::<f64>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--height" => {
                args.height = Some(
                    next_value(&mut it)?
                        .parse::<f64>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--id" => args.diagram_id = Some(next_value(&mut it)?.clone()),
            "--title" => args.title = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            _ => return Err(CliError::Usage(usage())),
        }
    }

    if args.command == Command::Import && args.csv.is_none() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

/// Defaults ← config file ← `--width/--height` ← `--set` overrides.
fn build_config(args: &Args) -> Result<TreeConfig, CliError> {
    let mut doc = ConfigDocument::new();
    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)?;
        doc.layer(ConfigDocument::from_json5(&text).map_err(CliError::Config)?);
    }
    if let Some(w) = args.width {
        doc.set_value("layout.width", Value::from(w));
    }
    if let Some(h) = args.height {
        doc.set_value("layout.height", Value::from(h));
    }
    for kv in &args.overrides {
        doc.set_override(kv).map_err(CliError::Config)?;
    }
    doc.to_tree_config().map_err(CliError::Config)
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run_import(args: &Args) -> Result<(), CliError> {
    let csv = args.csv.as_deref().ok_or(CliError::Usage(usage()))?;
    let file = std::fs::File::open(csv)?;
    let json = import::csv_to_json(std::io::BufReader::new(file)).map_err(CliError::Import)?;
    let out = args.out.as_deref().unwrap_or("family_data.json");
    std::fs::write(out, json)?;
    tracing::info!(csv = %csv.display(), out, "dataset written");
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Import => run_import(&args),
        Command::Layout | Command::Render => run_tree(args),
    }
}

fn run_tree(args: Args) -> Result<(), CliError> {
    let config = build_config(&args)?;
    let data_dir = args.data_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    let mut renderer = TreeRenderer::new().with_config(config);
    if let Some(id) = args.diagram_id.as_deref() {
        renderer = renderer.with_diagram_id(id);
    }

    let fetcher = FsFetcher::new(&data_dir);
    let data = match block_on(renderer.load(&fetcher)) {
        Ok(data) => data,
        Err(HeadlessError::Load(err)) => {
            tracing::error!(data_dir = %data_dir.display(), %err, "dataset unavailable");
            return Err(CliError::Load(err));
        }
        Err(err) => return Err(err.into()),
    };
    tracing::info!(
        persons = data.persons.len(),
        curated = data.is_curated(),
        "tree data loaded"
    );

    if args.command == Command::Layout {
        let layout = renderer.layout(&data)?;
        let mut json = lineage_render::layout_to_json(&layout, args.pretty)?;
        json.push('\n');
        return write_text(&json, args.out.as_deref());
    }

    match args.render_format {
        RenderFormat::Svg => {
            let svg = renderer.render_svg(&data)?;
            write_text(&svg, args.out.as_deref())
        }
        RenderFormat::Html => {
            let title = args.title.as_deref().unwrap_or("Family tree");
            let html = renderer.render_html(&data, title)?;
            write_text(&html, args.out.as_deref())
        }
        RenderFormat::Png => {
            let raster = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                resources_dir: Some(data_dir.clone()),
            };
            let bytes = renderer.render_png(&data, &raster)?;
            let out = args.out.as_deref().unwrap_or("out.png");
            std::fs::write(out, bytes)?;
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
