// gridboard: command-line front end for the dashboard grid layout engine.
// Loads a dashboard document, applies one command or a command script, and
// writes the result back.

mod command;
mod config;
mod document;
mod history;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use gridboard_core::{GridSize, PanelId, PanelSpec, PanelTarget, PlacementHint, ResizeHandle};
use gridboard_layout::{check, GridLayout};

use crate::command::{parse_script, Command, Editor};
use crate::config::Settings;

#[derive(Parser)]
#[command(name = "gridboard", version, about = "Edit the layout of a dashboard document")]
struct Cli {
    /// Settings file (defaults to the platform config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the result here instead of back to the input file
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Dashboard JSON document
    dashboard: PathBuf,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Move a panel (or a row with its band) to grid cell X,Y
    #[command(allow_negative_numbers = true)]
    Move {
        id: PanelId,
        x: f32,
        y: f32,
        /// Do not pack the canvas after the move
        #[arg(long)]
        no_pack: bool,
    },
    /// Drag a resize handle (n, s, e, w, ne, nw, se, sw) by DX,DY pixels
    #[command(allow_negative_numbers = true)]
    Resize {
        id: PanelId,
        #[arg(value_parser = parse_handle)]
        handle: ResizeHandle,
        dx: f32,
        dy: f32,
        /// Container width in pixels
        #[arg(long, value_name = "PX")]
        width: Option<f32>,
    },
    /// Add a panel of the given type
    Add {
        #[arg(value_name = "TYPE")]
        kind: String,
        #[arg(long)]
        title: Option<String>,
        /// Size in grid units, e.g. 6x4
        #[arg(long, value_name = "WxH", value_parser = parse_size)]
        size: Option<GridSize>,
        /// Add into this row
        #[arg(long, value_name = "ID")]
        row: Option<PanelId>,
        /// Initial cell, e.g. 12,3
        #[arg(long, value_name = "X,Y", value_parser = parse_cell, conflicts_with = "near", allow_hyphen_values = true)]
        at: Option<(i32, i32)>,
        /// Place next to this panel
        #[arg(long, value_name = "ID")]
        near: Option<PanelId>,
    },
    /// Copy a panel next to itself
    Duplicate { id: PanelId },
    /// Delete a panel (or a row, keeping its panels)
    Delete { id: PanelId },
    /// Collapse or expand a row
    ToggleRow {
        id: PanelId,
        #[arg(long, action = ArgAction::Set)]
        collapsed: bool,
    },
    /// Restack rows in the given order
    ReorderRows {
        #[arg(required = true)]
        ids: Vec<PanelId>,
    },
    /// Move a row and its band to line Y
    MoveRow { id: PanelId, y: i32 },
    /// Delete a row header, keeping its panels
    DeleteRow { id: PanelId },
    /// Pack the panels of one row upward
    PackRow { id: PanelId },
    /// Resolve overlaps and pack the whole dashboard
    Tidy,
    /// Normalize row metadata and panel order
    Canonicalize,
    /// Report layout violations; exits non-zero if any
    Check,
    /// Apply a JSON-lines command script
    Script { file: PathBuf },
}

fn parse_handle(s: &str) -> Result<ResizeHandle, String> {
    ResizeHandle::from_name(s).ok_or_else(|| format!("unknown handle '{}'", s))
}

fn parse_pair(s: &str, sep: char) -> Option<(i32, i32)> {
    let (a, b) = s.split_once(sep)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_size(s: &str) -> Result<GridSize, String> {
    parse_pair(&s.to_ascii_lowercase(), 'x')
        .map(|(w, h)| GridSize::new(w, h))
        .ok_or_else(|| format!("expected WxH, got '{}'", s))
}

fn parse_cell(s: &str) -> Result<(i32, i32), String> {
    parse_pair(s, ',').ok_or_else(|| format!("expected X,Y, got '{}'", s))
}

impl CliCommand {
    /// The layout command this invocation stands for, if any.
    fn to_command(&self) -> Option<Command> {
        let command = match self {
            CliCommand::Move { id, x, y, no_pack } => Command::Move {
                id: *id,
                x: *x,
                y: *y,
                skip_auto_pack: no_pack.then_some(true),
            },
            CliCommand::Resize {
                id,
                handle,
                dx,
                dy,
                width,
            } => Command::Resize {
                id: *id,
                handle: *handle,
                dx: *dx,
                dy: *dy,
                container_width: *width,
            },
            CliCommand::Add {
                kind,
                title,
                size,
                row,
                at,
                near,
            } => {
                let mut spec = PanelSpec::new(kind.as_str());
                spec.title = title.clone();
                spec.size = *size;
                spec.target = row.map_or(PanelTarget::TopLevel, PanelTarget::Row);
                spec.hint = match (at, near) {
                    (Some((x, y)), _) => Some(PlacementHint::At { x: *x, y: *y }),
                    (None, Some(id)) => Some(PlacementHint::Near(*id)),
                    (None, None) => None,
                };
                Command::Add { spec }
            }
            CliCommand::Duplicate { id } => Command::Duplicate { id: *id },
            CliCommand::Delete { id } => Command::Delete { id: *id },
            CliCommand::ToggleRow { id, collapsed } => Command::ToggleRow {
                id: *id,
                collapsed: *collapsed,
            },
            CliCommand::ReorderRows { ids } => Command::ReorderRows { order: ids.clone() },
            CliCommand::MoveRow { id, y } => Command::MoveRow { id: *id, y: *y },
            CliCommand::DeleteRow { id } => Command::DeleteRow { id: *id },
            CliCommand::PackRow { id } => Command::PackRow { id: *id },
            CliCommand::Tidy => Command::Tidy,
            CliCommand::Canonicalize => Command::Canonicalize,
            CliCommand::Check | CliCommand::Script { .. } => return None,
        };
        Some(command)
    }
}

// ──────────────────────────────────────────────
// Entry point
// ──────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings: Settings = config::load_settings(cli.config.as_deref());
    let dashboard = document::load(&cli.dashboard)
        .with_context(|| format!("Failed to load {}", cli.dashboard.display()))?;

    if let CliCommand::Check = cli.command {
        let violations = check(&dashboard);
        for violation in &violations {
            println!("{}", violation);
        }
        if !violations.is_empty() {
            bail!("{} layout violation(s) in {}", violations.len(), cli.dashboard.display());
        }
        println!("ok: {} panels", dashboard.all_panels().count());
        return Ok(());
    }

    let commands = match &cli.command {
        CliCommand::Script { file } => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read script {}", file.display()))?;
            parse_script(&text)?
        }
        other => other.to_command().into_iter().collect(),
    };

    let canonicalize = settings.canonicalize_on_save;
    let mut editor = Editor::new(GridLayout::new(), settings, dashboard);
    let changed = editor.run_all(&commands);
    log::info!("{} of {} command(s) changed the layout", changed, commands.len());

    let out = cli.output.as_ref().unwrap_or(&cli.dashboard);
    document::save(out, editor.dashboard(), canonicalize)
        .with_context(|| format!("Failed to save {}", out.display()))?;
    Ok(())
}
