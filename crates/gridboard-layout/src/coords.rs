// Coordinate model: bounds clamping and pixel/grid conversion.

use gridboard_core::{GridPos, GridTarget, Rect, Vec2, COLUMNS, ROW_HEIGHT_PX};

/// Move `pos` back inside the canvas. Width and height are never touched.
pub fn clamp_to_bounds(pos: GridPos) -> GridPos {
    let max_x = (COLUMNS - pos.w).max(0);
    GridPos {
        x: pos.x.clamp(0, max_x),
        y: pos.y.max(0),
        ..pos
    }
}

/// Pixel width of one grid column for a container of the given width.
pub fn column_width(container_width: f32) -> f32 {
    container_width / COLUMNS as f32
}

/// Convert a pixel point (or pixel delta) to whole grid units.
/// Rounds half away from zero. A degenerate container maps every x to 0.
pub fn pixels_to_grid(point: Vec2, container_width: f32) -> (i32, i32) {
    let col_width = column_width(container_width);
    let x = if col_width > 0.0 {
        (point.x / col_width).round() as i32
    } else {
        0
    };
    let y = (point.y / ROW_HEIGHT_PX).round() as i32;
    (x, y)
}

/// Pixel rectangle covered by a grid rectangle.
pub fn grid_to_pixels(pos: GridPos, container_width: f32) -> Rect {
    let col_width = column_width(container_width);
    Rect::new(
        pos.x as f32 * col_width,
        pos.y as f32 * ROW_HEIGHT_PX,
        pos.w as f32 * col_width,
        pos.h as f32 * ROW_HEIGHT_PX,
    )
}

/// Round a fractional target to the nearest grid cell.
pub fn snap_to_grid(target: GridTarget) -> (i32, i32) {
    (target.x.round() as i32, target.y.round() as i32)
}
