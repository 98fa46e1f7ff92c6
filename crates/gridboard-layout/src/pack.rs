// Auto-pack ("negative gravity"): slides panels upward to close vertical gaps.

use gridboard_core::{Panel, PanelId};

use crate::collision::{any_overlap, sorted_indices};

/// Pack every panel as high as it can go without overlapping another.
pub fn auto_pack(panels: &[Panel]) -> Vec<Panel> {
    auto_pack_around(panels, 0, None)
}

/// Pack panels upward, never above `floor`.
pub fn auto_pack_above(panels: &[Panel], floor: i32) -> Vec<Panel> {
    auto_pack_around(panels, floor, None)
}

/// Pack panels upward, never above `floor`, leaving `pinned` where it is.
///
/// Panels are processed in `(y, x, id)` order, and each checks against the
/// current positions of all others, so earlier panels are already final
/// when later ones move. A panel slides up until the line above it is
/// taken, exactly as if it moved one grid unit at a time. Panels already at
/// or above `floor` are left alone. The pinned panel never moves but still
/// blocks the others.
pub fn auto_pack_around(panels: &[Panel], floor: i32, pinned: Option<PanelId>) -> Vec<Panel> {
    let mut out = panels.to_vec();
    let order = sorted_indices(&out);

    for i in order {
        let id = out[i].id;
        let pos = out[i].grid_pos;
        if Some(id) == pinned || pos.y <= floor {
            continue;
        }
        let first_step = pos.with_origin(pos.x, pos.y - 1);
        if any_overlap(&out, &first_step, Some(id)) {
            continue;
        }
        // Once the first step is free, only panels entirely above can stop
        // the slide: it ends on the lowest of their bottom edges.
        let resting = out
            .iter()
            .filter(|other| other.id != id)
            .filter(|other| other.grid_pos.x < pos.right() && pos.x < other.grid_pos.right())
            .map(|other| other.grid_pos.bottom())
            .filter(|&bottom| bottom < pos.y)
            .fold(floor, i32::max);
        out[i].shift_y(resting.saturating_sub(pos.y));
    }

    out
}
