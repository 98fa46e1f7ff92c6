// Collision primitives shared by the resolver, the packer and placement.

use std::cmp::Ordering;

use gridboard_core::{GridPos, Panel, PanelId};

/// Half-open rectangle overlap. Touching edges do not overlap.
pub fn rect_overlap(a: &GridPos, b: &GridPos) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
}

/// True if `rect` overlaps any panel in `scope` other than `exclude`.
pub fn any_overlap(scope: &[Panel], rect: &GridPos, exclude: Option<PanelId>) -> bool {
    scope
        .iter()
        .any(|p| Some(p.id) != exclude && rect_overlap(rect, &p.grid_pos))
}

/// Every panel in `scope` (other than `exclude`) that overlaps `rect`, in scope order.
pub fn find_overlapping_panels<'a>(
    scope: &'a [Panel],
    rect: &GridPos,
    exclude: Option<PanelId>,
) -> Vec<&'a Panel> {
    scope
        .iter()
        .filter(|p| Some(p.id) != exclude && rect_overlap(rect, &p.grid_pos))
        .collect()
}

/// The `(y, x, id)` total order used to break every tie in the engine.
pub fn layout_order(a: &Panel, b: &Panel) -> Ordering {
    (a.grid_pos.y, a.grid_pos.x, a.id).cmp(&(b.grid_pos.y, b.grid_pos.x, b.id))
}

/// Indices of `panels` sorted by [`layout_order`].
pub(crate) fn sorted_indices(panels: &[Panel]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..panels.len()).collect();
    order.sort_by(|&a, &b| layout_order(&panels[a], &panels[b]));
    order
}
