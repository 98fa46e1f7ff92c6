// Layout commands: the serializable form of every engine operation, plus an
// editor that applies them to a dashboard with undo/redo.

use serde::{Deserialize, Serialize};

use gridboard_core::{
    Dashboard, GridTarget, LayoutEngine, PanelId, PanelSpec, ResizeHandle, Vec2,
};

use crate::config::Settings;
use crate::history::History;

/// One line of a command script, e.g.
/// `{"op": "move", "id": 3, "x": 0, "y": 4}` or `{"op": "undo"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    Move {
        id: PanelId,
        x: f32,
        y: f32,
        /// Overrides `Settings::pack_after_move` when present.
        #[serde(default)]
        skip_auto_pack: Option<bool>,
    },
    Resize {
        id: PanelId,
        handle: ResizeHandle,
        dx: f32,
        dy: f32,
        #[serde(default)]
        container_width: Option<f32>,
    },
    Add {
        spec: PanelSpec,
    },
    Duplicate {
        id: PanelId,
    },
    Delete {
        id: PanelId,
    },
    ToggleRow {
        id: PanelId,
        collapsed: bool,
    },
    ReorderRows {
        order: Vec<PanelId>,
    },
    MoveRow {
        id: PanelId,
        y: i32,
    },
    DeleteRow {
        id: PanelId,
    },
    PackRow {
        id: PanelId,
    },
    Tidy,
    Canonicalize,
    Undo,
    Redo,
}

impl Command {
    /// Run a layout command through `engine`. `Undo` and `Redo` are history
    /// operations and return the dashboard unchanged here.
    pub fn apply(
        &self,
        engine: &impl LayoutEngine,
        dashboard: &Dashboard,
        settings: &Settings,
    ) -> Dashboard {
        match self {
            Command::Move {
                id,
                x,
                y,
                skip_auto_pack,
            } => {
                let skip = skip_auto_pack.unwrap_or(!settings.pack_after_move);
                engine.move_panel(dashboard, *id, GridTarget::new(*x, *y), skip)
            }
            Command::Resize {
                id,
                handle,
                dx,
                dy,
                container_width,
            } => engine.resize(
                dashboard,
                *id,
                *handle,
                Vec2::new(*dx, *dy),
                container_width.unwrap_or(settings.container_width),
            ),
            Command::Add { spec } => engine.add_panel(dashboard, spec),
            Command::Duplicate { id } => engine.duplicate_panel(dashboard, *id),
            Command::Delete { id } => engine.delete_panel(dashboard, *id),
            Command::ToggleRow { id, collapsed } => {
                engine.toggle_row_collapsed(dashboard, *id, *collapsed)
            }
            Command::ReorderRows { order } => engine.reorder_rows(dashboard, order),
            Command::MoveRow { id, y } => engine.move_row(dashboard, *id, *y),
            Command::DeleteRow { id } => engine.delete_row(dashboard, *id),
            Command::PackRow { id } => engine.pack_row(dashboard, *id),
            Command::Tidy => engine.tidy_up(dashboard),
            Command::Canonicalize => engine.canonicalize_rows(dashboard),
            Command::Undo | Command::Redo => dashboard.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("script line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse a JSON-lines command script. Blank lines and lines starting with
/// `#` are skipped; `line` in errors is 1-based.
pub fn parse_script(text: &str) -> Result<Vec<Command>, ScriptError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, json)| serde_json::from_str(json).map_err(|source| ScriptError { line, source }))
        .collect()
}

// ──────────────────────────────────────────────
// Editor
// ──────────────────────────────────────────────

/// A dashboard being edited: the current snapshot plus its undo history.
pub struct Editor<E: LayoutEngine> {
    engine: E,
    settings: Settings,
    current: Dashboard,
    history: History,
}

impl<E: LayoutEngine> Editor<E> {
    pub fn new(engine: E, settings: Settings, dashboard: Dashboard) -> Self {
        let history = History::new(settings.history_limit);
        Self {
            engine,
            settings,
            current: dashboard,
            history,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.current
    }

    /// Execute one command. Returns whether the dashboard changed; commands
    /// that change nothing do not create an undo step.
    pub fn execute(&mut self, command: &Command) -> bool {
        match command {
            Command::Undo => {
                if !self.history.can_undo() {
                    log::info!("Nothing to undo");
                    return false;
                }
                self.step(|history, current| history.undo(current))
            }
            Command::Redo => {
                if !self.history.can_redo() {
                    log::info!("Nothing to redo");
                    return false;
                }
                self.step(|history, current| history.redo(current))
            }
            _ => {
                let next = command.apply(&self.engine, &self.current, &self.settings);
                if next == self.current {
                    log::debug!("{:?} left the dashboard unchanged", command);
                    return false;
                }
                let before = std::mem::replace(&mut self.current, next);
                self.history.record(before);
                true
            }
        }
    }

    fn step(&mut self, f: impl FnOnce(&mut History, &Dashboard) -> Option<Dashboard>) -> bool {
        match f(&mut self.history, &self.current) {
            Some(snapshot) => {
                self.current = snapshot;
                true
            }
            None => false,
        }
    }

    /// Execute every command in order. Returns how many changed the dashboard.
    pub fn run_all(&mut self, commands: &[Command]) -> usize {
        commands.iter().filter(|c| self.execute(c)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridboard_core::{GridPos, Panel};
    use gridboard_layout::GridLayout;

    fn editor() -> Editor<GridLayout> {
        let dashboard = Dashboard::new(
            "test",
            vec![
                Panel::new(1, "stat", GridPos::new(0, 0, 6, 2)),
                Panel::new(2, "stat", GridPos::new(0, 2, 6, 2)),
            ],
        );
        Editor::new(GridLayout::new(), Settings::default(), dashboard)
    }

    #[test]
    fn test_parse_script() {
        let script = r#"
            # drag the first panel down
            {"op": "move", "id": 1, "x": 0, "y": 10, "skipAutoPack": true}
            {"op": "resize", "id": 2, "handle": "se", "dx": 100, "dy": 60}
            {"op": "add", "spec": {"type": "table", "target": {"row": 5}, "hint": {"near": 2}}}
            {"op": "toggleRow", "id": 5, "collapsed": true}
            {"op": "undo"}
        "#;
        let commands = parse_script(script).unwrap();
        assert_eq!(commands.len(), 5);
        assert_eq!(
            commands[0],
            Command::Move { id: 1, x: 0.0, y: 10.0, skip_auto_pack: Some(true) }
        );
        assert!(matches!(commands[1], Command::Resize { handle: ResizeHandle::Se, .. }));
        match &commands[2] {
            Command::Add { spec } => {
                assert_eq!(spec.kind, "table");
                assert_eq!(spec.target, gridboard_core::PanelTarget::Row(5));
                assert_eq!(spec.hint, Some(gridboard_core::PlacementHint::Near(2)));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(commands[4], Command::Undo);
    }

    #[test]
    fn test_parse_script_reports_line() {
        let err = parse_script("{\"op\": \"tidy\"}\n\n{\"op\": \"fly\"}").unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_move_uses_pack_setting() {
        let mut editor = editor();
        editor.execute(&Command::Move { id: 1, x: 0.0, y: 10.0, skip_auto_pack: None });
        // Packed: panel 2 slides into the gap, the dropped panel stays put.
        assert_eq!(editor.dashboard().panel(2).unwrap().grid_pos.y, 0);
        assert_eq!(editor.dashboard().panel(1).unwrap().grid_pos.y, 10);
    }

    #[test]
    fn test_resize_uses_container_width_setting() {
        let mut editor = editor();
        let resize = Command::Resize {
            id: 1,
            handle: ResizeHandle::E,
            dx: 100.0,
            dy: 0.0,
            container_width: None,
        };
        assert!(editor.execute(&resize));
        assert_eq!(editor.dashboard().panel(1).unwrap().grid_pos.w, 8);
    }

    #[test]
    fn test_undo_redo_through_editor() {
        let mut editor = editor();
        let original = editor.dashboard().clone();

        assert!(editor.execute(&Command::Delete { id: 1 }));
        let deleted = editor.dashboard().clone();
        assert!(deleted.panel(1).is_none());

        assert!(editor.execute(&Command::Undo));
        assert_eq!(editor.dashboard(), &original);
        assert!(editor.execute(&Command::Redo));
        assert_eq!(editor.dashboard(), &deleted);
        assert!(!editor.execute(&Command::Redo));
    }

    #[test]
    fn test_no_op_commands_do_not_record_history() {
        let mut editor = editor();
        let changed = editor.run_all(&[
            Command::Delete { id: 99 },
            Command::Tidy,
            Command::Undo,
        ]);
        assert_eq!(changed, 0);
    }
}
