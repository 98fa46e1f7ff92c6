// Placement: id assignment, first-fit search and insertion of new panels.

use gridboard_core::{
    kind_defaults, Dashboard, GridPos, GridSize, Panel, PanelId, PanelSpec, PanelTarget,
    PlacementHint, RowState, Scope, COLUMNS, ROW_KIND,
};

use crate::collision::any_overlap;
use crate::coords::clamp_to_bounds;
use crate::push_down::resolve_collisions_push_down;
use crate::resize::min_size;
use crate::rows::{collect_scope_panels, compute_bands, scope_of};

/// Number of rows first-fit scans before giving up.
pub const FIRST_FIT_ROWS: i32 = 100;

/// One more than the largest id anywhere in the dashboard, including
/// children of collapsed rows.
pub fn next_id(dashboard: &Dashboard) -> PanelId {
    dashboard.all_panels().map(|p| p.id).max().unwrap_or(0) + 1
}

/// First free slot of `size`, scanning rows from `min_y` down and columns
/// left to right. Falls back to `(0, min_y)` after `FIRST_FIT_ROWS` rows.
pub fn first_fit(scope: &[Panel], size: GridSize, min_y: i32) -> (i32, i32) {
    let w = size.w.clamp(1, COLUMNS);
    for y in min_y..min_y.saturating_add(FIRST_FIT_ROWS) {
        for x in 0..=(COLUMNS - w) {
            let candidate = GridPos::new(x, y, w, size.h);
            if !any_overlap(scope, &candidate, None) {
                return (x, y);
            }
        }
    }
    (0, min_y)
}

/// Position next to `reference`: directly to its right when that spot is
/// free, otherwise directly below it.
fn near(scope: &[Panel], reference: &GridPos, size: GridSize) -> (i32, i32) {
    let right = GridPos::new(reference.right(), reference.y, size.w, size.h);
    if right.right() <= COLUMNS && !any_overlap(scope, &right, None) {
        return (right.x, right.y);
    }
    (reference.x, reference.bottom())
}

/// Where a panel is searched for and inserted.
struct Destination {
    scope: Scope,
    /// Panels the search must avoid.
    search: Vec<Panel>,
    /// First line the panel may occupy.
    min_y: i32,
    /// Bottom of the band for expanded rows with a following header.
    band_bottom: Option<i32>,
    /// Lowest bottom edge of the current band content.
    content_end: i32,
}

fn destination(dashboard: &Dashboard, scope: Scope) -> Option<Destination> {
    match scope {
        Scope::TopLevel => Some(Destination {
            scope,
            search: dashboard.panels.clone(),
            min_y: 0,
            band_bottom: None,
            content_end: 0,
        }),
        Scope::Row { row_id, state } => {
            let row = dashboard.panel(row_id).filter(|p| p.is_row())?;
            let min_y = row.content_top();
            match state {
                RowState::Collapsed => Some(Destination {
                    scope,
                    search: row.children().to_vec(),
                    min_y,
                    band_bottom: None,
                    content_end: min_y,
                }),
                RowState::Expanded => {
                    let band_bottom = compute_bands(&dashboard.panels)
                        .into_iter()
                        .find(|b| b.row_id == row_id)
                        .and_then(|b| b.bottom);
                    let content_end = collect_scope_panels(dashboard, scope)
                        .iter()
                        .map(|p| p.grid_pos.bottom())
                        .max()
                        .unwrap_or(min_y)
                        .max(min_y);
                    Some(Destination {
                        scope,
                        search: dashboard.panels.clone(),
                        min_y,
                        band_bottom,
                        content_end,
                    })
                }
            }
        }
    }
}

/// Insert `panel` into the destination scope and push colliding panels down
/// within that scope only. Expanded row children live at top level, so that
/// scope resolves against the top-level array.
fn insert_into(dashboard: &Dashboard, dest: &Destination, panel: Panel) -> Dashboard {
    let mut out = dashboard.clone();
    let id = panel.id;
    match dest.scope {
        Scope::Row {
            row_id,
            state: RowState::Collapsed,
        } => {
            if let Some(row) = out.panels.iter_mut().find(|p| p.id == row_id) {
                let children = row.panels.get_or_insert_with(Vec::new);
                children.push(panel);
                *children = resolve_collisions_push_down(children, Some(id));
            }
        }
        _ => {
            out.panels.push(panel);
            out.panels = resolve_collisions_push_down(&out.panels, Some(id));
        }
    }
    out
}

fn initial_position(dest: &Destination, size: GridSize, hint: Option<PlacementHint>) -> (i32, i32) {
    match hint {
        Some(PlacementHint::At { x, y }) => return (x, y.max(dest.min_y)),
        Some(PlacementHint::Near(id)) => {
            if let Some(reference) = dest.search.iter().find(|p| p.id == id && !p.is_row()) {
                return near(&dest.search, &reference.grid_pos, size);
            }
            log::debug!("place_new_panel: hint panel {} not in target scope", id);
        }
        None => {}
    }

    let (x, y) = first_fit(&dest.search, size, dest.min_y);
    match dest.band_bottom {
        // The band is full: start a new line at the end of its content and
        // let the rows below be pushed down.
        Some(bottom) if y >= bottom => (0, dest.content_end),
        _ => (x, y),
    }
}

/// Add a new panel described by `spec`.
///
/// Rows always go to top level. An unknown target row leaves the dashboard
/// unchanged. The size is clamped up to the type's minimum, the position is
/// clamped into the canvas, and collisions are resolved in the target scope.
pub fn place_new_panel(dashboard: &Dashboard, spec: &PanelSpec) -> Dashboard {
    let defaults = kind_defaults(&spec.kind);
    let is_row = spec.kind == ROW_KIND;

    let scope = match spec.target {
        PanelTarget::Row(row_id) if !is_row => {
            let Some(row) = dashboard.panel(row_id).filter(|p| p.is_row()) else {
                log::debug!("place_new_panel: no row {}", row_id);
                return dashboard.clone();
            };
            let state = if row.is_collapsed() {
                RowState::Collapsed
            } else {
                RowState::Expanded
            };
            Scope::Row { row_id, state }
        }
        _ => Scope::TopLevel,
    };
    let Some(dest) = destination(dashboard, scope) else {
        return dashboard.clone();
    };

    let min = min_size(&spec.kind);
    let size = if is_row {
        GridSize::new(COLUMNS, 1)
    } else {
        let wanted = spec.size.unwrap_or(defaults.default_size);
        GridSize::new(wanted.w.clamp(min.w, COLUMNS), wanted.h.max(min.h))
    };

    let (x, y) = initial_position(&dest, size, spec.hint);
    let pos = clamp_to_bounds(GridPos::new(x, y, size.w, size.h));

    let id = next_id(dashboard);
    let mut panel = if is_row {
        Panel::row(id, pos.y)
    } else {
        Panel::new(id, spec.kind.clone(), pos)
    };
    panel.title = spec
        .title
        .clone()
        .unwrap_or_else(|| defaults.title.to_string());
    panel.options = defaults.options();

    log::debug!("place_new_panel: {} #{} at {:?} in {:?}", spec.kind, id, pos, scope);
    insert_into(dashboard, &dest, panel)
}

/// Copy a panel under a fresh id next to the original, in the same scope.
/// Rows and unknown ids are a no-op.
pub fn duplicate_panel(dashboard: &Dashboard, id: PanelId) -> Dashboard {
    let Some(scope) = scope_of(dashboard, id) else {
        log::debug!("duplicate_panel: no panel {}", id);
        return dashboard.clone();
    };
    let Some(source) = dashboard.find_panel(id).filter(|p| !p.is_row()) else {
        return dashboard.clone();
    };
    let Some(dest) = destination(dashboard, scope) else {
        return dashboard.clone();
    };

    let size = source.grid_pos.size();
    let (x, y) = near(&dest.search, &source.grid_pos, size);
    let mut copy = source.clone();
    copy.id = next_id(dashboard);
    copy.grid_pos = clamp_to_bounds(GridPos::new(x, y.max(dest.min_y), size.w, size.h));
    insert_into(dashboard, &dest, copy)
}
