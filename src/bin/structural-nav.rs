//! structural-nav
//!
//! Loads an accessibility snapshot from JSON and runs structural navigation
//! commands against it, printing what a screen reader would present.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::{json, Value};
use structural_nav::commands::{CommandContext, CommandRegistry};
use structural_nav::{NavigationMode, NavigatorSettings, RecordingPresenter, SnapshotTree, StructuralNavigator};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Category commands disabled
    Off,
    /// Search the document around the focus
    Document,
    /// Search the dialog or window around the focus
    Gui,
}

impl From<Mode> for NavigationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Off => NavigationMode::Off,
            Mode::Document => NavigationMode::Document,
            Mode::Gui => NavigationMode::Gui,
        }
    }
}

#[derive(Parser)]
#[command(name = "structural-nav")]
#[command(version)]
#[command(about = "Run structural navigation commands against an accessibility snapshot", long_about = None)]
struct Cli {
    /// JSON accessibility snapshot
    #[arg(long, short = 't', value_name = "FILE", required_unless_present = "list_commands")]
    tree: Option<String>,

    /// JSON navigator settings
    #[arg(long, short = 's', value_name = "FILE")]
    settings: Option<String>,

    /// Navigation mode
    #[arg(long, short = 'm', value_enum, default_value = "document")]
    mode: Mode,

    /// Snapshot id of the starting object (default: the focused node, else the root)
    #[arg(long, short = 'f', value_name = "ID")]
    focus: Option<String>,

    /// Snapshot id of a live region that has just spoken
    #[arg(long, value_name = "ID")]
    live_region: Option<String>,

    /// Disable collection queries so every search traverses
    #[arg(long)]
    no_collection: bool,

    /// Disable table geometry so cell moves follow document order
    #[arg(long)]
    no_table_support: bool,

    /// Do not wrap at the ends of the document
    #[arg(long)]
    no_wrap: bool,

    /// Skip blank cells when moving through tables
    #[arg(long)]
    skip_blank_cells: bool,

    /// Announce row and column after each cell move
    #[arg(long)]
    present_cell_coordinates: bool,

    /// Do not announce how far a spanning cell reaches
    #[arg(long)]
    no_cell_span: bool,

    /// Print the available commands and exit
    #[arg(long)]
    list_commands: bool,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Commands to run in order, as `name` or `name:{"level":2}`
    commands: Vec<String>,
}

fn load_settings(cli: &Cli) -> Result<NavigatorSettings> {
    let mut settings = match &cli.settings {
        Some(path) => NavigatorSettings::from_json_file(path).with_context(|| format!("Failed to load settings from {}", path))?,
        None => NavigatorSettings::default(),
    };
    if cli.no_wrap {
        settings = settings.wrap(false);
    }
    if cli.skip_blank_cells {
        settings = settings.skip_blank_cells(true);
    }
    if cli.present_cell_coordinates {
        settings = settings.present_cell_coordinates(true);
    }
    if cli.no_cell_span {
        settings = settings.speak_cell_span(false);
    }
    Ok(settings)
}

fn parse_command(raw: &str) -> Result<(&str, Value)> {
    match raw.split_once(':') {
        Some((name, params)) => {
            let params: Value =
                serde_json::from_str(params).with_context(|| format!("Invalid parameters for {}", name))?;
            Ok((name, params))
        }
        None => Ok((raw, Value::Null)),
    }
}

fn print_commands(registry: &CommandRegistry, navigator: &StructuralNavigator, as_json: bool) -> Result<()> {
    let infos = registry.describe(navigator);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }
    for info in infos {
        println!(
            "{:<36} {:<16} {:<8} {}",
            info.name,
            info.binding.unwrap_or_default(),
            if info.enabled { "enabled" } else { "disabled" },
            info.description
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let settings = load_settings(&cli)?;
    let mut navigator = StructuralNavigator::new(settings).with_mode(cli.mode.into());
    let registry = CommandRegistry::with_defaults();

    if cli.list_commands {
        return print_commands(&registry, &navigator, cli.json);
    }

    let path = cli.tree.as_deref().context("--tree is required")?;
    let mut tree = SnapshotTree::from_json_file(path).with_context(|| format!("Failed to load snapshot {}", path))?;
    if cli.no_collection {
        tree.set_collection(false);
    }
    let tree = tree.with_table_support(!cli.no_table_support);

    let focus = match &cli.focus {
        Some(id) => tree.node(id).with_context(|| format!("Unknown focus id {}", id))?,
        None => tree.focused().unwrap_or_else(|| tree.root()),
    };
    navigator.set_locus_of_focus(Some(focus));
    if let Some(id) = &cli.live_region {
        let region = tree.node(id).with_context(|| format!("Unknown live region id {}", id))?;
        navigator.note_live_region(region);
    }
    log::info!("Loaded {} nodes from {}, starting at {}", tree.len(), path, focus);

    let mut presenter = RecordingPresenter::new();
    for raw in &cli.commands {
        let (name, params) = parse_command(raw)?;
        let result = {
            let mut context = CommandContext::new(&mut navigator, &tree, &mut presenter);
            registry
                .execute(name, params, &mut context)
                .with_context(|| format!("Command {} failed", name))?
        };
        let presentations = presenter.take();

        if cli.json {
            println!(
                "{}",
                json!({
                    "command": name,
                    "result": result,
                    "presentations": presentations,
                })
            );
            continue;
        }

        println!("> {}{}", name, if result.handled { "" } else { " (disabled)" });
        for presentation in &presentations {
            println!("  {}", presentation);
        }
    }

    Ok(())
}
