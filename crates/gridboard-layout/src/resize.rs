// Resize engine: per-handle rectangle transform with minimum-size enforcement.

use gridboard_core::{kind_defaults, GridPos, GridSize, ResizeHandle, Vec2, COLUMNS};

use crate::coords::{clamp_to_bounds, pixels_to_grid};

/// Minimum grid size for a panel type, bounded to what the canvas can hold.
pub fn min_size(kind: &str) -> GridSize {
    let min = kind_defaults(kind).min_size;
    GridSize::new(min.w.clamp(1, COLUMNS), min.h.max(1))
}

/// Compute the rectangle produced by dragging `handle` by a pixel `delta`.
///
/// Each handle only moves the edges its compass direction names; the
/// opposite edge stays put unless the minimum size forces it to give way.
/// The result always satisfies the type's minimum size and lies inside the
/// canvas.
pub fn resize_rect_from_handle(
    pos: GridPos,
    handle: ResizeHandle,
    delta: Vec2,
    container_width: f32,
    kind: &str,
) -> GridPos {
    let min = min_size(kind);
    let (dx, dy) = pixels_to_grid(delta, container_width);

    let (x, w) = if handle.moves_right() {
        grow_end(pos.x, pos.w, dx, min.w, Some(COLUMNS))
    } else if handle.moves_left() {
        grow_start(pos.x, pos.right().min(COLUMNS), dx, min.w)
    } else {
        (pos.x, pos.w)
    };

    let (y, h) = if handle.moves_bottom() {
        grow_end(pos.y, pos.h, dy, min.h, None)
    } else if handle.moves_top() {
        grow_start(pos.y, pos.bottom(), dy, min.h)
    } else {
        (pos.y, pos.h)
    };

    // Handles that leave an axis alone still have to honour the minimum.
    let w = w.max(min.w).min(COLUMNS);
    let h = h.max(min.h);
    clamp_to_bounds(GridPos::new(x, y, w, h))
}

/// Move the far edge of a span (`e` / `s`). The start stays fixed unless
/// the minimum does not fit before `limit`.
fn grow_end(start: i32, len: i32, delta: i32, min: i32, limit: Option<i32>) -> (i32, i32) {
    let wanted = len.saturating_add(delta);
    match limit {
        Some(limit) => {
            let room = limit - start;
            if min > room {
                ((limit - min).max(0), min)
            } else {
                (start, wanted.clamp(min, room))
            }
        }
        None => (start, wanted.max(min)),
    }
}

/// Move the near edge of a span (`w` / `n`) keeping `end` fixed. The start
/// never goes below zero; if the minimum would need it to, the end gives way.
fn grow_start(start: i32, end: i32, delta: i32, min: i32) -> (i32, i32) {
    let new_start = start.saturating_add(delta).max(0);
    let len = end - new_start;
    if len >= min {
        return (new_start, len);
    }
    ((end - min).max(0), min)
}
