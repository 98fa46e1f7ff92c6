// Orchestration: the move/resize/tidy/delete pipelines composed from the
// coordinate model, the push-down resolver and the packer.

use gridboard_core::{Dashboard, GridTarget, Panel, PanelId, ResizeHandle, RowState, Scope, Vec2};

use crate::coords::{clamp_to_bounds, snap_to_grid};
use crate::pack::{auto_pack, auto_pack_above, auto_pack_around};
use crate::push_down::resolve_collisions_push_down;
use crate::resize::resize_rect_from_handle;
use crate::rows::{collect_scope_panels, delete_row, merge_by_id, move_row, scope_of};

/// Run `f` over the panel array a scope lives in: the top-level array for
/// top-level and expanded-row scopes, the embedded array for collapsed rows.
/// `f` receives the array and the first line panels may occupy.
fn with_scope_array(
    dashboard: &Dashboard,
    scope: Scope,
    f: impl FnOnce(&[Panel], i32) -> Vec<Panel>,
) -> Dashboard {
    let mut out = dashboard.clone();
    match scope {
        Scope::Row {
            row_id,
            state: RowState::Collapsed,
        } => {
            if let Some(row) = out.panels.iter_mut().find(|p| p.id == row_id) {
                let floor = row.content_top();
                let children = row.panels.get_or_insert_with(Vec::new);
                *children = f(children, floor);
            }
        }
        _ => {
            out.panels = f(&out.panels, 0);
        }
    }
    out
}

/// Move a panel to `to`.
///
/// Pipeline: locate, replace the origin, round to the grid, clamp into the
/// canvas, push colliding panels down, then pack unless `skip_auto_pack`.
/// The pack leaves the moved panel where it was dropped, so dropping it on
/// the same target again changes nothing. Moving a row header moves its
/// whole block. Unknown ids are a no-op.
pub fn move_panel(
    dashboard: &Dashboard,
    id: PanelId,
    to: GridTarget,
    skip_auto_pack: bool,
) -> Dashboard {
    let Some(scope) = scope_of(dashboard, id) else {
        log::debug!("move_panel: no panel {}", id);
        return dashboard.clone();
    };
    if dashboard.panel(id).is_some_and(|p| p.is_row()) {
        let (_, y) = snap_to_grid(to);
        return move_row(dashboard, id, y);
    }

    with_scope_array(dashboard, scope, |panels, floor| {
        let mut moved = panels.to_vec();
        if let Some(panel) = moved.iter_mut().find(|p| p.id == id) {
            let (x, y) = snap_to_grid(to);
            let pos = clamp_to_bounds(panel.grid_pos.with_origin(x, y));
            panel.grid_pos = pos.with_origin(pos.x, pos.y.max(floor));
        }
        let resolved = resolve_collisions_push_down(&moved, Some(id));
        if skip_auto_pack {
            resolved
        } else {
            auto_pack_around(&resolved, floor, Some(id))
        }
    })
}

/// Resize a panel by dragging one of its handles, then push colliding panels
/// down. Never packs. Row headers and unknown ids are a no-op.
pub fn apply_resize(
    dashboard: &Dashboard,
    id: PanelId,
    handle: ResizeHandle,
    delta: Vec2,
    container_width: f32,
) -> Dashboard {
    let Some(scope) = scope_of(dashboard, id) else {
        log::debug!("apply_resize: no panel {}", id);
        return dashboard.clone();
    };
    if dashboard.panel(id).is_some_and(|p| p.is_row()) {
        return dashboard.clone();
    }

    with_scope_array(dashboard, scope, |panels, floor| {
        let mut resized = panels.to_vec();
        if let Some(panel) = resized.iter_mut().find(|p| p.id == id) {
            let pos =
                resize_rect_from_handle(panel.grid_pos, handle, delta, container_width, &panel.kind);
            panel.grid_pos = pos.with_origin(pos.x, pos.y.max(floor));
        }
        resolve_collisions_push_down(&resized, Some(id))
    })
}

/// Remove residual overlaps and pack the whole canvas. Full-width row
/// headers stop panels from crossing into another band. Collapsed rows have
/// their embedded children packed under the header.
pub fn tidy_up(dashboard: &Dashboard) -> Dashboard {
    let mut out = dashboard.clone();
    out.panels = auto_pack(&resolve_collisions_push_down(&out.panels, None));
    for row in out.panels.iter_mut().filter(|p| p.is_collapsed()) {
        let floor = row.content_top();
        if let Some(children) = row.panels.as_mut() {
            *children = auto_pack_above(&resolve_collisions_push_down(children, None), floor);
        }
    }
    out
}

/// Delete a panel and pack the scope it lived in. Row ids delete the row
/// (promoting its children). Unknown ids are a no-op.
pub fn delete_panel(dashboard: &Dashboard, id: PanelId) -> Dashboard {
    let Some(scope) = scope_of(dashboard, id) else {
        log::debug!("delete_panel: no panel {}", id);
        return dashboard.clone();
    };
    if dashboard.panel(id).is_some_and(|p| p.is_row()) {
        return delete_row(dashboard, id);
    }

    match scope {
        Scope::Row {
            row_id,
            state: RowState::Expanded,
        } => {
            let mut out = dashboard.clone();
            out.panels.retain(|p| p.id != id);
            let floor = out.panel(row_id).map_or(0, Panel::content_top);
            let members = collect_scope_panels(&out, scope);
            merge_by_id(&mut out.panels, auto_pack_above(&members, floor));
            out
        }
        _ => with_scope_array(dashboard, scope, |panels, floor| {
            let remaining: Vec<Panel> = panels.iter().filter(|p| p.id != id).cloned().collect();
            auto_pack_above(&remaining, floor)
        }),
    }
}
