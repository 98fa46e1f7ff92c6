// Dashboard grid layout engine.
// Implements gridboard_core::LayoutEngine over a fixed 24-column canvas:
// push-down collision resolution, auto-pack, handle resizing, row bands
// and first-fit placement. Every operation returns a new Dashboard.

pub mod collision;
pub mod coords;
pub mod ops;
pub mod pack;
pub mod placement;
pub mod push_down;
pub mod resize;
pub mod rows;
pub mod validate;

use gridboard_core::{Dashboard, GridTarget, LayoutEngine, PanelId, PanelSpec, ResizeHandle, Vec2};

pub use collision::{any_overlap, find_overlapping_panels, layout_order, rect_overlap};
pub use coords::{clamp_to_bounds, grid_to_pixels, pixels_to_grid};
pub use ops::{apply_resize, delete_panel, move_panel, tidy_up};
pub use pack::{auto_pack, auto_pack_above, auto_pack_around};
pub use placement::{duplicate_panel, first_fit, next_id, place_new_panel};
pub use push_down::resolve_collisions_push_down;
pub use resize::{min_size, resize_rect_from_handle};
pub use rows::{
    canonicalize_rows, collect_scope_panels, compute_bands, delete_row, move_row, pack_row,
    reorder_rows, scope_of, toggle_row_collapsed,
};
pub use validate::{check, Violation};

// ──────────────────────────────────────────────
// GridLayout
// ──────────────────────────────────────────────

/// The grid layout engine. Stateless: the dashboard snapshot is always
/// passed in and a new one handed back.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridLayout;

impl GridLayout {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutEngine for GridLayout {
    fn move_panel(
        &self,
        dashboard: &Dashboard,
        id: PanelId,
        to: GridTarget,
        skip_auto_pack: bool,
    ) -> Dashboard {
        ops::move_panel(dashboard, id, to, skip_auto_pack)
    }

    fn resize(
        &self,
        dashboard: &Dashboard,
        id: PanelId,
        handle: ResizeHandle,
        delta: Vec2,
        container_width: f32,
    ) -> Dashboard {
        ops::apply_resize(dashboard, id, handle, delta, container_width)
    }

    fn add_panel(&self, dashboard: &Dashboard, spec: &PanelSpec) -> Dashboard {
        placement::place_new_panel(dashboard, spec)
    }

    fn duplicate_panel(&self, dashboard: &Dashboard, id: PanelId) -> Dashboard {
        placement::duplicate_panel(dashboard, id)
    }

    fn delete_panel(&self, dashboard: &Dashboard, id: PanelId) -> Dashboard {
        ops::delete_panel(dashboard, id)
    }

    fn toggle_row_collapsed(
        &self,
        dashboard: &Dashboard,
        row_id: PanelId,
        collapsed: bool,
    ) -> Dashboard {
        rows::toggle_row_collapsed(dashboard, row_id, collapsed)
    }

    fn reorder_rows(&self, dashboard: &Dashboard, new_order: &[PanelId]) -> Dashboard {
        rows::reorder_rows(dashboard, new_order)
    }

    fn move_row(&self, dashboard: &Dashboard, row_id: PanelId, new_y: i32) -> Dashboard {
        rows::move_row(dashboard, row_id, new_y)
    }

    fn delete_row(&self, dashboard: &Dashboard, row_id: PanelId) -> Dashboard {
        rows::delete_row(dashboard, row_id)
    }

    fn pack_row(&self, dashboard: &Dashboard, row_id: PanelId) -> Dashboard {
        rows::pack_row(dashboard, row_id)
    }

    fn tidy_up(&self, dashboard: &Dashboard) -> Dashboard {
        ops::tidy_up(dashboard)
    }

    fn canonicalize_rows(&self, dashboard: &Dashboard) -> Dashboard {
        rows::canonicalize_rows(dashboard)
    }
}
