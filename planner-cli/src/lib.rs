//! # Strategy Planner CLI
//!
//! Command-line tooling around `PCWSTRAT-` share codes.
//!
//! ## Usage
//!
//! ```bash
//! strat-planner info PCWSTRAT-...
//! strat-planner decode --input plan.txt > plan.json
//! strat-planner encode plan.json
//! strat-planner export-svg PCWSTRAT-... --output plan.svg --include-map
//! strat-planner --config planner.json maps
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `run` - Executes a command and returns what to print
//! - Uses `planner-renderer::PlanExporter` for SVG output

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use planner_core::{decode_plan, encode_plan, MapCatalog, Plan, PlannerConfig};
use planner_renderer::{ExportConfig, PlanExporter};

/// Command-line arguments for strat-planner.
#[derive(Debug, Clone, Parser)]
#[command(name = "strat-planner")]
#[command(about = "Inspect, encode and export strategy planner share codes")]
#[command(version)]
pub struct CliArgs {
    /// Planner configuration JSON (map catalog, default style)
    #[arg(long, global = true, env = "STRAT_PLANNER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Where a share code comes from.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct CodeSource {
    /// Share code (`PCWSTRAT-...`)
    pub code: Option<String>,

    /// Read the share code from a file (`-` for stdin)
    #[arg(long, short)]
    pub input: Option<PathBuf>,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the plan inside a share code as JSON
    Decode {
        /// Code to decode
        #[command(flatten)]
        source: CodeSource,
    },
    /// Turn a plan JSON file into a share code
    Encode {
        /// Plan JSON file (`-` for stdin)
        plan: PathBuf,
    },
    /// Summarize a share code
    Info {
        /// Code to summarize
        #[command(flatten)]
        source: CodeSource,
    },
    /// List the selectable maps
    Maps,
    /// Render a share code to SVG
    ExportSvg {
        /// Code to render
        #[command(flatten)]
        source: CodeSource,
        /// Output file
        #[arg(long, short)]
        output: PathBuf,
        /// Output width in pixels (default: plan width)
        #[arg(long)]
        width: Option<u32>,
        /// Output height in pixels (default: plan height)
        #[arg(long)]
        height: Option<u32>,
        /// Background color
        #[arg(long, default_value = "#ffffff")]
        background: String,
        /// Draw the map image under the plan
        #[arg(long)]
        include_map: bool,
    },
}

/// Load the planner configuration, or the defaults when no file is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PlannerConfig> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = PlannerConfig::from_json(&json)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), maps = config.maps.len(), "Loaded config");
    Ok(config)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Resolve a [`CodeSource`] and decode it.
///
/// # Errors
///
/// Returns an error if the input cannot be read or does not decode.
pub fn read_plan(source: &CodeSource) -> anyhow::Result<Plan> {
    let code = match (&source.code, &source.input) {
        (Some(code), _) => code.clone(),
        (None, Some(path)) => read_input(path)?,
        (None, None) => bail!("No share code given"),
    };
    if code.trim().is_empty() {
        bail!("Please enter a share code");
    }
    decode_plan(&code).context("Failed to load plan. Please check the share code.")
}

/// Pretty-printed JSON of a plan.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn decode(plan: &Plan) -> anyhow::Result<String> {
    serde_json::to_string_pretty(plan).context("Failed to serialize plan")
}

/// Share code for a plan JSON document.
///
/// # Errors
///
/// Returns an error if the JSON is not a plan, breaks a length limit, or
/// cannot be encoded.
pub fn encode(json: &str) -> anyhow::Result<String> {
    let plan: Plan = serde_json::from_str(json).context("Input is not a plan")?;
    plan.validate()?;
    let code = encode_plan(&plan)?;
    tracing::info!(items = plan.item_count(), code_len = code.len(), "Encoded plan");
    Ok(code)
}

/// Human-readable summary of a plan.
#[must_use]
pub fn info(plan: &Plan, maps: &MapCatalog) -> String {
    let map = maps
        .find(&plan.map)
        .map_or_else(|| format!("{} (unknown)", plan.map), |m| m.name.clone());

    let mut out = String::new();
    let _ = writeln!(out, "Map:         {map}");
    if !plan.title.is_empty() {
        let _ = writeln!(out, "Title:       {}", plan.title);
    }
    if !plan.description.is_empty() {
        let _ = writeln!(out, "Description: {}", plan.description);
    }
    let _ = writeln!(out, "Created:     {}", plan.created_at.to_rfc3339());
    if let Some(extent) = plan.extent {
        let _ = writeln!(out, "Extent:      {}x{}", extent.width, extent.height);
    }
    let _ = writeln!(
        out,
        "Layers:      {} ({} items)",
        plan.layers.len(),
        plan.item_count()
    );
    for (i, layer) in plan.layers.iter().enumerate() {
        let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &layer.items {
            *kinds.entry(item.shape.name()).or_default() += 1;
        }
        let kinds: Vec<String> = kinds.iter().map(|(k, n)| format!("{n} {k}")).collect();
        let hidden = if layer.visible { "" } else { " [hidden]" };
        let _ = writeln!(
            out,
            "  {}. {}{hidden}: {}",
            i + 1,
            layer.name,
            if kinds.is_empty() {
                "empty".to_string()
            } else {
                kinds.join(", ")
            }
        );
    }
    out
}

/// One line per map: id, name and image URL.
#[must_use]
pub fn list_maps(maps: &MapCatalog) -> String {
    let mut out = String::new();
    for map in maps.maps() {
        let _ = writeln!(out, "{:<14} {:<14} {}", map.id, map.name, map.image);
    }
    out
}

/// Execute a command, returning the text to print.
///
/// # Errors
///
/// Returns an error if the command fails; the message is fit for the user.
pub fn run(args: &CliArgs) -> anyhow::Result<String> {
    let config = load_config(args.config.as_deref())?;
    match &args.command {
        Command::Decode { source } => decode(&read_plan(source)?),
        Command::Encode { plan } => encode(&read_input(plan)?),
        Command::Info { source } => Ok(info(&read_plan(source)?, &config.maps)),
        Command::Maps => Ok(list_maps(&config.maps)),
        Command::ExportSvg {
            source,
            output,
            width,
            height,
            background,
            include_map,
        } => {
            let plan = read_plan(source)?;
            let exporter = PlanExporter::new(ExportConfig {
                width: *width,
                height: *height,
                background: background.clone(),
                include_map: *include_map,
            })
            .with_maps(config.maps);
            let svg = exporter.render_to_svg(&plan).context("Failed to render plan")?;
            fs::write(output, &svg)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            Ok(format!("Wrote {} ({} bytes)", output.display(), svg.len()))
        }
    }
}
