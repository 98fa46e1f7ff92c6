// Row/banding manager.
//
// A row header owns a vertical band of the canvas. Expanded rows keep their
// children at top level and claim them only by position; collapsed rows carry
// their children in an embedded array and occupy a single header line.

use std::collections::HashSet;

use gridboard_core::{Band, Dashboard, Panel, PanelId, RowState, Scope, COLUMNS};

use crate::collision::layout_order;
use crate::pack::auto_pack_above;
use crate::push_down::resolve_collisions_push_down;

fn row_state(row: &Panel) -> RowState {
    if row.is_collapsed() {
        RowState::Collapsed
    } else {
        RowState::Expanded
    }
}

// ──────────────────────────────────────────────
// Bands and scopes
// ──────────────────────────────────────────────

/// Derive the band of every top-level row header, ordered by header `y`.
///
/// A band starts at its header and ends at the next header. An explicit
/// `rowBandHeight` override ends it earlier (never later), and a band always
/// covers at least its own header line.
pub fn compute_bands(panels: &[Panel]) -> Vec<Band> {
    let mut headers: Vec<&Panel> = panels.iter().filter(|p| p.is_row()).collect();
    headers.sort_by_key(|row| (row.grid_pos.y, row.id));

    headers
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let top = row.grid_pos.y;
            let next = headers.get(i + 1).map(|n| n.grid_pos.y);
            let own = row
                .row_band_height()
                .map(|h| top.saturating_add(1).saturating_add(h.max(0)));
            let bottom = match (own, next) {
                (Some(own), Some(next)) => Some(own.min(next)),
                (own, next) => own.or(next),
            };
            Band {
                row_id: row.id,
                state: row_state(row),
                top,
                bottom: bottom.map(|b| b.max(top.saturating_add(1))),
            }
        })
        .collect()
}

/// The band that claims a panel starting at line `y`: the last band whose
/// header is at or above `y`, provided `y` is still inside it.
pub(crate) fn owning_band(bands: &[Band], y: i32) -> Option<&Band> {
    bands
        .iter()
        .rev()
        .find(|band| band.top <= y)
        .filter(|band| band.contains(y))
}

/// Ids of the top-level panels inside the band of `row_id`.
fn band_member_ids(panels: &[Panel], bands: &[Band], row_id: PanelId) -> HashSet<PanelId> {
    panels
        .iter()
        .filter(|p| !p.is_row())
        .filter(|p| owning_band(bands, p.grid_pos.y).is_some_and(|b| b.row_id == row_id))
        .map(|p| p.id)
        .collect()
}

/// Which scope a panel belongs to. Children of collapsed rows are found
/// first, then band membership decides between a row scope and top level.
pub fn scope_of(dashboard: &Dashboard, panel_id: PanelId) -> Option<Scope> {
    for row in dashboard.rows().filter(|r| r.is_collapsed()) {
        if row.children().iter().any(|c| c.id == panel_id) {
            return Some(Scope::Row {
                row_id: row.id,
                state: RowState::Collapsed,
            });
        }
    }

    let panel = dashboard.panel(panel_id)?;
    if panel.is_row() {
        return Some(Scope::TopLevel);
    }
    let bands = compute_bands(&dashboard.panels);
    match owning_band(&bands, panel.grid_pos.y) {
        Some(band) if band.state == RowState::Expanded => Some(Scope::Row {
            row_id: band.row_id,
            state: RowState::Expanded,
        }),
        _ => Some(Scope::TopLevel),
    }
}

/// Materialize the panels of a scope. An unknown row yields an empty set.
pub fn collect_scope_panels(dashboard: &Dashboard, scope: Scope) -> Vec<Panel> {
    match scope {
        Scope::TopLevel => dashboard.panels.clone(),
        Scope::Row {
            row_id,
            state: RowState::Collapsed,
        } => dashboard
            .panel(row_id)
            .map(|row| row.children().to_vec())
            .unwrap_or_default(),
        Scope::Row {
            row_id,
            state: RowState::Expanded,
        } => {
            let bands = compute_bands(&dashboard.panels);
            let members = band_member_ids(&dashboard.panels, &bands, row_id);
            dashboard
                .panels
                .iter()
                .filter(|p| members.contains(&p.id))
                .cloned()
                .collect()
        }
    }
}

/// Write scope panels back into `panels` by id.
pub(crate) fn merge_by_id(panels: &mut [Panel], updated: Vec<Panel>) {
    for panel in updated {
        if let Some(slot) = panels.iter_mut().find(|p| p.id == panel.id) {
            *slot = panel;
        }
    }
}

fn row_index(panels: &[Panel], row_id: PanelId) -> Option<usize> {
    panels.iter().position(|p| p.id == row_id && p.is_row())
}

// ──────────────────────────────────────────────
// Collapse / expand
// ──────────────────────────────────────────────

/// Collapse or expand a row. Asking for the state the row is already in,
/// or naming an unknown row, returns the dashboard unchanged.
pub fn toggle_row_collapsed(dashboard: &Dashboard, row_id: PanelId, collapsed: bool) -> Dashboard {
    let mut out = dashboard.clone();
    let Some(index) = row_index(&out.panels, row_id) else {
        log::debug!("toggle_row_collapsed: no row {}", row_id);
        return out;
    };
    if out.panels[index].is_collapsed() == collapsed {
        return out;
    }

    if collapsed {
        collapse_row(&mut out.panels, index);
    } else {
        expand_row(&mut out.panels, index);
    }
    out.panels = resolve_collisions_push_down(&out.panels, None);
    out
}

/// Move the band members of the row at `index` into its embedded array and
/// pull the content below the band up by the space it freed.
fn collapse_row(panels: &mut Vec<Panel>, index: usize) {
    let row_id = panels[index].id;
    let bands = compute_bands(panels);
    let Some(band) = bands.iter().find(|b| b.row_id == row_id).copied() else {
        return;
    };
    let members = band_member_ids(panels, &bands, row_id);

    let mut children = Vec::with_capacity(members.len());
    panels.retain(|p| {
        if members.contains(&p.id) {
            children.push(p.clone());
            false
        } else {
            true
        }
    });

    if let Some(bottom) = band.bottom {
        let freed = bottom.saturating_sub(band.top.saturating_add(1));
        if freed > 0 {
            for panel in panels.iter_mut().filter(|p| p.grid_pos.y >= bottom) {
                panel.shift_y(-freed);
            }
        }
    }

    if let Some(row) = panels.iter_mut().find(|p| p.id == row_id) {
        row.collapsed = Some(true);
        row.panels = Some(children);
    }
}

/// Promote the embedded children of the row at `index` to top level, directly
/// under the header, pushing everything below the header down to make room.
fn expand_row(panels: &mut Vec<Panel>, index: usize) {
    let row = &mut panels[index];
    row.collapsed = Some(false);
    let mut children = row.panels.take().unwrap_or_default();
    let header_y = row.grid_pos.y;
    let first_line = row.content_top();
    if children.is_empty() {
        return;
    }

    let min_y = children.iter().map(|c| c.grid_pos.y).min().unwrap_or(first_line);
    let offset = first_line.saturating_sub(min_y);
    for child in &mut children {
        child.grid_pos.y = child.grid_pos.y.saturating_add(offset).max(first_line);
    }
    let extent = children
        .iter()
        .map(|c| c.grid_pos.bottom())
        .max()
        .unwrap_or(first_line)
        .saturating_sub(first_line);

    for panel in panels.iter_mut().filter(|p| p.grid_pos.y > header_y) {
        panel.shift_y(extent);
    }
    let at = index + 1;
    panels.splice(at..at, children);
}

// ──────────────────────────────────────────────
// Structural row edits
// ──────────────────────────────────────────────

/// Delete a row header, promoting its children to top level first.
/// Content below the header moves up into the freed header line.
pub fn delete_row(dashboard: &Dashboard, row_id: PanelId) -> Dashboard {
    let mut out = dashboard.clone();
    let Some(index) = row_index(&out.panels, row_id) else {
        log::debug!("delete_row: no row {}", row_id);
        return out;
    };

    if out.panels[index].is_collapsed() || !out.panels[index].children().is_empty() {
        expand_row(&mut out.panels, index);
    }
    let header = out.panels.remove(index);
    let header_y = header.grid_pos.y;
    for panel in out.panels.iter_mut().filter(|p| p.grid_pos.y > header_y) {
        panel.shift_y(-1);
    }
    out.panels = resolve_collisions_push_down(&out.panels, None);
    out
}

/// Vertical block occupied by a row: from its header to the next header,
/// or to the lowest panel bottom for the last row.
struct RowBlock {
    row_id: PanelId,
    top: i32,
    height: i32,
}

fn row_blocks(panels: &[Panel]) -> Vec<RowBlock> {
    let mut headers: Vec<&Panel> = panels.iter().filter(|p| p.is_row()).collect();
    headers.sort_by_key(|row| (row.grid_pos.y, row.id));

    headers
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let top = row.grid_pos.y;
            let end = match headers.get(i + 1) {
                Some(next) => next.grid_pos.y,
                None => panels
                    .iter()
                    .filter(|p| p.grid_pos.y >= top)
                    .map(|p| p.grid_pos.bottom())
                    .max()
                    .unwrap_or(row.content_top()),
            };
            RowBlock {
                row_id: row.id,
                top,
                height: end.saturating_sub(top).max(1),
            }
        })
        .collect()
}

/// Restack row blocks in `new_order`. Each row travels with everything in
/// its block, so band membership is unchanged. Content above the first row
/// stays where it is. `new_order` must be a permutation of the current
/// top-level row ids; anything else is a no-op.
pub fn reorder_rows(dashboard: &Dashboard, new_order: &[PanelId]) -> Dashboard {
    let mut out = dashboard.clone();
    let blocks = row_blocks(&out.panels);

    let current: HashSet<PanelId> = blocks.iter().map(|b| b.row_id).collect();
    let requested: HashSet<PanelId> = new_order.iter().copied().collect();
    if new_order.len() != blocks.len() || requested != current {
        log::debug!("reorder_rows: {:?} is not a permutation of the rows", new_order);
        return out;
    }
    let Some(start) = blocks.first().map(|b| b.top) else {
        return out;
    };

    // Block membership is decided on the original positions.
    let owners: Vec<Option<usize>> = out
        .panels
        .iter()
        .map(|p| {
            if p.grid_pos.y < start {
                return None;
            }
            blocks.iter().rposition(|b| b.top <= p.grid_pos.y)
        })
        .collect();

    let mut shifts = vec![0; blocks.len()];
    let mut cursor = start;
    for id in new_order {
        if let Some(i) = blocks.iter().position(|b| b.row_id == *id) {
            shifts[i] = cursor.saturating_sub(blocks[i].top);
            cursor = cursor.saturating_add(blocks[i].height);
        }
    }

    for (panel, owner) in out.panels.iter_mut().zip(owners) {
        if let Some(i) = owner {
            panel.shift_y(shifts[i]);
        }
    }
    out.panels = resolve_collisions_push_down(&out.panels, None);
    out
}

/// Move a row (and its block) so that it sits before the first other row
/// whose header is at or below `new_y`.
pub fn move_row(dashboard: &Dashboard, row_id: PanelId, new_y: i32) -> Dashboard {
    let blocks = row_blocks(&dashboard.panels);
    if !blocks.iter().any(|b| b.row_id == row_id) {
        log::debug!("move_row: no row {}", row_id);
        return dashboard.clone();
    }

    let mut order: Vec<PanelId> = blocks
        .iter()
        .filter(|b| b.row_id != row_id)
        .map(|b| b.row_id)
        .collect();
    let at = blocks
        .iter()
        .filter(|b| b.row_id != row_id)
        .position(|b| b.top >= new_y)
        .unwrap_or(order.len());
    order.insert(at, row_id);
    reorder_rows(dashboard, &order)
}

/// Pack a row's children upward without letting any of them leave the band.
pub fn pack_row(dashboard: &Dashboard, row_id: PanelId) -> Dashboard {
    let mut out = dashboard.clone();
    let Some(index) = row_index(&out.panels, row_id) else {
        log::debug!("pack_row: no row {}", row_id);
        return out;
    };
    let floor = out.panels[index].content_top();

    if out.panels[index].is_collapsed() {
        let row = &mut out.panels[index];
        if let Some(children) = row.panels.as_mut() {
            *children = auto_pack_above(children, floor);
        }
        return out;
    }

    let members = collect_scope_panels(
        dashboard,
        Scope::Row {
            row_id,
            state: RowState::Expanded,
        },
    );
    let packed = auto_pack_above(&members, floor);
    merge_by_id(&mut out.panels, packed);
    out
}

// ──────────────────────────────────────────────
// Canonical form
// ──────────────────────────────────────────────

/// Normalize row metadata before persistence.
///
/// Row headers become full-width single lines with an explicit `collapsed`
/// flag; collapsed rows always carry an embedded array, rebased so no child
/// sits above the line under its header, and expanded rows
/// never do (stale children are promoted). Top-level panels and every
/// embedded array end up sorted by `(y, x, id)`. Running it again on its
/// own output changes nothing.
pub fn canonicalize_rows(dashboard: &Dashboard) -> Dashboard {
    let mut out = dashboard.clone();

    for row in out.panels.iter_mut().filter(|p| p.is_row()) {
        row.grid_pos.x = 0;
        row.grid_pos.w = COLUMNS;
        row.grid_pos.h = 1;
        row.grid_pos.y = row.grid_pos.y.max(0);
        if row.is_collapsed() {
            let first_line = row.content_top();
            let children = row.panels.get_or_insert_with(Vec::new);
            // Children left above the header line move down under it.
            let lowest = children.iter().map(|c| c.grid_pos.y).min().unwrap_or(first_line);
            if lowest < first_line {
                let offset = first_line.saturating_sub(lowest);
                for child in children.iter_mut() {
                    child.grid_pos.y = child.grid_pos.y.saturating_add(offset);
                }
            }
            children.sort_by(layout_order);
        } else {
            row.collapsed = Some(false);
        }
    }

    while let Some(index) = out
        .panels
        .iter()
        .position(|p| p.is_row() && !p.is_collapsed() && p.panels.is_some())
    {
        expand_row(&mut out.panels, index);
    }

    out.panels = resolve_collisions_push_down(&out.panels, None);
    out.panels.sort_by(layout_order);
    out
}
