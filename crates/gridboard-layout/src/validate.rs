// Invariant checks over a whole dashboard document.

use std::collections::HashSet;
use std::fmt;

use gridboard_core::{Dashboard, GridPos, Panel, PanelId, COLUMNS};

use crate::collision::rect_overlap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two panels in the same scope overlap. `row` names the collapsed row
    /// whose embedded panels collide, `None` for top level.
    Overlap {
        a: PanelId,
        b: PanelId,
        row: Option<PanelId>,
    },
    OutOfBounds { id: PanelId, pos: GridPos },
    EmptySize { id: PanelId, pos: GridPos },
    DuplicateId(PanelId),
    /// A row header that is not a full-width single line.
    MalformedRow { id: PanelId, pos: GridPos },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Overlap { a, b, row: None } => {
                write!(f, "panels {} and {} overlap", a, b)
            }
            Violation::Overlap { a, b, row: Some(row) } => {
                write!(f, "panels {} and {} overlap inside row {}", a, b, row)
            }
            Violation::OutOfBounds { id, pos } => {
                write!(f, "panel {} is out of bounds at {:?}", id, pos)
            }
            Violation::EmptySize { id, pos } => {
                write!(f, "panel {} has an empty size {}x{}", id, pos.w, pos.h)
            }
            Violation::DuplicateId(id) => write!(f, "id {} is used more than once", id),
            Violation::MalformedRow { id, pos } => {
                write!(f, "row {} is not a full-width header line: {:?}", id, pos)
            }
        }
    }
}

fn overlaps_in(panels: &[Panel], row: Option<PanelId>, out: &mut Vec<Violation>) {
    for (i, a) in panels.iter().enumerate() {
        for b in &panels[i + 1..] {
            if rect_overlap(&a.grid_pos, &b.grid_pos) {
                out.push(Violation::Overlap { a: a.id, b: b.id, row });
            }
        }
    }
}

/// Every invariant violation in `dashboard`, in document order.
/// An empty result means the document is a valid layout.
pub fn check(dashboard: &Dashboard) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut seen = HashSet::new();
    for panel in dashboard.all_panels() {
        let pos = panel.grid_pos;
        if !seen.insert(panel.id) {
            violations.push(Violation::DuplicateId(panel.id));
        }
        if pos.w <= 0 || pos.h <= 0 {
            violations.push(Violation::EmptySize { id: panel.id, pos });
        }
        if pos.x < 0 || pos.y < 0 || pos.right() > COLUMNS {
            violations.push(Violation::OutOfBounds { id: panel.id, pos });
        }
        if panel.is_row() && (pos.x != 0 || pos.w != COLUMNS || pos.h != 1) {
            violations.push(Violation::MalformedRow { id: panel.id, pos });
        }
    }

    overlaps_in(&dashboard.panels, None, &mut violations);
    for row in dashboard.rows() {
        overlaps_in(row.children(), Some(row.id), &mut violations);
    }

    violations
}
