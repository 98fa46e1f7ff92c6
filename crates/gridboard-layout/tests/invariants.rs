//! Property-based invariant tests for the grid layout engine.
//!
//! These tests check properties that must hold for any generated layout:
//!
//! 1. The push-down resolver leaves no overlaps and only moves panels down.
//! 2. Moving a panel keeps every panel inside the canvas.
//! 3. Dropping a panel twice on the same target changes nothing the second time.
//! 4. Auto-pack never moves a panel down, is stable, and keeps layouts valid.
//! 5. Resizing never goes below the panel type's minimum size.
//! 6. Identical inputs give identical (serialized) outputs.
//! 7. Collapsing and expanding rows never loses or overlaps panels.
//! 8. Any sequence of edits leaves a valid layout after every step.
//! 9. Row edits and placement give identical (serialized) outputs.

use gridboard_core::{
    kind_defaults, Dashboard, GridPos, GridTarget, Panel, PanelId, PanelSpec, PanelTarget,
    PlacementHint, ResizeHandle, Vec2, COLUMNS,
};
use gridboard_layout::{
    apply_resize, auto_pack, check, delete_panel, duplicate_panel, move_panel, move_row,
    pack_row, place_new_panel, rect_overlap, reorder_rows, resolve_collisions_push_down,
    tidy_up, toggle_row_collapsed,
};
use proptest::prelude::*;
use proptest::sample::Index;

const WIDTH: f32 = 1200.0;
const KINDS: &[&str] = &["stat", "gauge", "text", "table", "timeseries", "piechart", "unknown"];

// ── Helpers ─────────────────────────────────────────────────────────────

fn panel_strategy() -> impl Strategy<Value = (i32, i32, i32, i32, usize)> {
    (0i32..COLUMNS, 0i32..30, 1i32..=8, 1i32..=6, 0..KINDS.len())
}

/// Panels with ids `1..=n`, inside the canvas but possibly overlapping.
fn panels(max_len: usize) -> impl Strategy<Value = Vec<Panel>> {
    proptest::collection::vec(panel_strategy(), 1..=max_len).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, w, h, kind))| {
                let x = x.min(COLUMNS - w);
                Panel::new(i as PanelId + 1, KINDS[kind], GridPos::new(x, y, w, h))
            })
            .collect()
    })
}

/// A valid (overlap-free) layout of `max_len` panels at most.
fn resolved_panels(max_len: usize) -> impl Strategy<Value = Vec<Panel>> {
    panels(max_len).prop_map(|p| resolve_collisions_push_down(&p, None))
}

fn no_overlaps(panels: &[Panel]) -> bool {
    panels.iter().enumerate().all(|(i, a)| {
        panels[i + 1..]
            .iter()
            .all(|b| !rect_overlap(&a.grid_pos, &b.grid_pos))
    })
}

fn in_bounds(pos: &GridPos) -> bool {
    pos.x >= 0 && pos.y >= 0 && pos.w >= 1 && pos.h >= 1 && pos.right() <= COLUMNS
}

fn dash(panels: Vec<Panel>) -> Dashboard {
    Dashboard::new("fuzz", panels)
}

fn sorted_ids(dashboard: &Dashboard) -> Vec<PanelId> {
    let mut ids: Vec<PanelId> = dashboard.all_panels().map(|p| p.id).collect();
    ids.sort_unstable();
    ids
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Push-down resolver
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn push_down_removes_all_overlaps(input in panels(24), pick in any::<Index>()) {
        let moved = input[pick.index(input.len())].id;
        let out = resolve_collisions_push_down(&input, Some(moved));

        prop_assert!(no_overlaps(&out), "overlap left after resolving {:?}", out);
        for (before, after) in input.iter().zip(&out) {
            prop_assert_eq!(before.id, after.id);
            prop_assert_eq!(before.grid_pos.x, after.grid_pos.x);
            prop_assert_eq!(before.grid_pos.w, after.grid_pos.w);
            prop_assert_eq!(before.grid_pos.h, after.grid_pos.h);
            prop_assert!(after.grid_pos.y >= before.grid_pos.y);
            if after.id == moved {
                prop_assert_eq!(after.grid_pos, before.grid_pos);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Bounds after move
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn move_keeps_layout_in_bounds(
        input in resolved_panels(16),
        pick in any::<Index>(),
        tx in -10.0f32..40.0,
        ty in -10.0f32..60.0,
        skip_pack in any::<bool>(),
    ) {
        let id = input[pick.index(input.len())].id;
        let out = move_panel(&dash(input), id, GridTarget::new(tx, ty), skip_pack);

        for panel in &out.panels {
            prop_assert!(in_bounds(&panel.grid_pos), "{} out of bounds: {:?}", panel.id, panel.grid_pos);
        }
        prop_assert!(no_overlaps(&out.panels));
        prop_assert!(check(&out).is_empty(), "violations: {:?}", check(&out));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Move idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn repeated_drop_is_a_no_op(
        input in resolved_panels(16),
        pick in any::<Index>(),
        tx in 0.0f32..24.0,
        ty in 0.0f32..40.0,
        skip_pack in any::<bool>(),
    ) {
        let id = input[pick.index(input.len())].id;
        let target = GridTarget::new(tx, ty);
        let once = move_panel(&dash(input), id, target, skip_pack);
        let twice = move_panel(&once, id, target, skip_pack);
        prop_assert_eq!(once, twice);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Auto-pack
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pack_only_moves_up(input in resolved_panels(24)) {
        let out = auto_pack(&input);
        for (before, after) in input.iter().zip(&out) {
            prop_assert_eq!(before.id, after.id);
            prop_assert!(after.grid_pos.y <= before.grid_pos.y);
            prop_assert!(after.grid_pos.y >= 0);
            prop_assert_eq!(before.grid_pos.x, after.grid_pos.x);
        }
        prop_assert!(no_overlaps(&out));
    }

    #[test]
    fn pack_is_stable(input in resolved_panels(24)) {
        let once = auto_pack(&input);
        prop_assert_eq!(auto_pack(&once), once);
    }

    #[test]
    fn tidy_up_yields_valid_layout(input in panels(24)) {
        let out = tidy_up(&dash(input));
        prop_assert!(check(&out).is_empty(), "violations: {:?}", check(&out));
        prop_assert_eq!(tidy_up(&out), out);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Resize minimums
// ═════════════════════════════════════════════════════════════════════════

fn handle_strategy() -> impl Strategy<Value = ResizeHandle> {
    prop::sample::select(ResizeHandle::ALL.to_vec())
}

proptest! {
    #[test]
    fn resize_never_shrinks_below_minimum(
        input in resolved_panels(12),
        pick in any::<Index>(),
        handle in handle_strategy(),
        dx in -1.0e6f32..1.0e6,
        dy in -1.0e6f32..1.0e6,
    ) {
        let target = &input[pick.index(input.len())];
        let id = target.id;
        let min = kind_defaults(&target.kind).min_size;
        let out = apply_resize(&dash(input.clone()), id, handle, Vec2::new(dx, dy), WIDTH);

        let pos = out.panel(id).map(|p| p.grid_pos);
        prop_assert!(pos.is_some());
        let pos = pos.unwrap_or_default();
        prop_assert!(pos.w >= min.w.min(COLUMNS), "{:?} narrower than {:?}", pos, min);
        prop_assert!(pos.h >= min.h, "{:?} shorter than {:?}", pos, min);
        prop_assert!(in_bounds(&pos));
        prop_assert!(no_overlaps(&out.panels));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn operations_are_deterministic(
        input in panels(16),
        pick in any::<Index>(),
        tx in -5.0f32..30.0,
        ty in -5.0f32..40.0,
    ) {
        let id = input[pick.index(input.len())].id;
        let d = dash(input);
        let a = tidy_up(&move_panel(&d, id, GridTarget::new(tx, ty), false));
        let b = tidy_up(&move_panel(&d, id, GridTarget::new(tx, ty), false));

        let a_json = serde_json::to_string(&a).unwrap();
        let b_json = serde_json::to_string(&b).unwrap();
        prop_assert_eq!(a_json, b_json);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Rows
// ═════════════════════════════════════════════════════════════════════════

/// Resolved panels below two row headers placed at lines 0 and `split`.
fn with_rows(input: Vec<Panel>, split: i32) -> Dashboard {
    let mut all = vec![Panel::row(1000, 0), Panel::row(2000, split)];
    all.extend(input.into_iter().map(|mut p| {
        p.grid_pos.y += 1;
        p
    }));
    dash(resolve_collisions_push_down(&all, None))
}

proptest! {
    #[test]
    fn collapse_expand_keeps_every_panel(
        input in resolved_panels(12),
        split in 2i32..20,
        first in any::<bool>(),
    ) {
        let d = with_rows(input, split);
        let row = if first { 1000 } else { 2000 };

        let collapsed = toggle_row_collapsed(&d, row, true);
        prop_assert_eq!(sorted_ids(&collapsed), sorted_ids(&d));
        prop_assert!(check(&collapsed).is_empty(), "violations: {:?}", check(&collapsed));

        let expanded = toggle_row_collapsed(&collapsed, row, false);
        prop_assert_eq!(sorted_ids(&expanded), sorted_ids(&d));
        prop_assert!(expanded.panels.iter().all(|p| p.panels.is_none()));
        prop_assert!(check(&expanded).is_empty(), "violations: {:?}", check(&expanded));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Edit sequences
// ═════════════════════════════════════════════════════════════════════════

const ADD_KINDS: &[&str] = &["stat", "gauge", "text", "table", "timeseries", "unknown", "row"];

/// One editor action. Panel and row ids are picked from the dashboard the
/// step is applied to.
#[derive(Debug, Clone)]
enum Step {
    Move { pick: Index, x: f32, y: f32, skip_pack: bool },
    Resize { pick: Index, handle: ResizeHandle, dx: f32, dy: f32 },
    Add { kind: &'static str, row: Option<Index>, hint: Option<PlacementHint> },
    Delete(Index),
    Duplicate(Index),
    ToggleRow { pick: Index, collapsed: bool },
    PackRow(Index),
    MoveRow { pick: Index, y: i32 },
}

impl Step {
    fn keeps_panels(&self) -> bool {
        !matches!(self, Step::Add { .. } | Step::Delete(_) | Step::Duplicate(_))
    }
}

fn hint_strategy() -> impl Strategy<Value = Option<PlacementHint>> {
    prop_oneof![
        Just(None::<PlacementHint>),
        (-4i32..30, -4i32..40).prop_map(|(x, y)| Some(PlacementHint::At { x, y })),
        (1u64..30).prop_map(|id| Some(PlacementHint::Near(id))),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (any::<Index>(), -10.0f32..40.0, -10.0f32..60.0, any::<bool>())
            .prop_map(|(pick, x, y, skip_pack)| Step::Move { pick, x, y, skip_pack }),
        2 => (any::<Index>(), handle_strategy(), -800.0f32..800.0, -300.0f32..300.0)
            .prop_map(|(pick, handle, dx, dy)| Step::Resize { pick, handle, dx, dy }),
        2 => (
            prop::sample::select(ADD_KINDS),
            proptest::option::of(any::<Index>()),
            hint_strategy(),
        )
            .prop_map(|(kind, row, hint)| Step::Add { kind, row, hint }),
        1 => any::<Index>().prop_map(Step::Delete),
        1 => any::<Index>().prop_map(Step::Duplicate),
        2 => (any::<Index>(), any::<bool>())
            .prop_map(|(pick, collapsed)| Step::ToggleRow { pick, collapsed }),
        1 => any::<Index>().prop_map(Step::PackRow),
        1 => (any::<Index>(), 0i32..40).prop_map(|(pick, y)| Step::MoveRow { pick, y }),
    ]
}

fn pick(ids: &[PanelId], index: &Index) -> Option<PanelId> {
    (!ids.is_empty()).then(|| ids[index.index(ids.len())])
}

fn apply_step(d: &Dashboard, step: &Step) -> Dashboard {
    let panel_ids = sorted_ids(d);
    let row_ids: Vec<PanelId> = d.rows().map(|r| r.id).collect();

    match step {
        Step::Move { pick: i, x, y, skip_pack } => match pick(&panel_ids, i) {
            Some(id) => move_panel(d, id, GridTarget::new(*x, *y), *skip_pack),
            None => d.clone(),
        },
        Step::Resize { pick: i, handle, dx, dy } => match pick(&panel_ids, i) {
            Some(id) => apply_resize(d, id, *handle, Vec2::new(*dx, *dy), WIDTH),
            None => d.clone(),
        },
        Step::Add { kind, row, hint } => {
            let mut spec = PanelSpec::new(*kind);
            spec.hint = *hint;
            if let Some(row_id) = row.as_ref().and_then(|i| pick(&row_ids, i)) {
                spec.target = PanelTarget::Row(row_id);
            }
            place_new_panel(d, &spec)
        }
        Step::Delete(i) => match pick(&panel_ids, i) {
            Some(id) => delete_panel(d, id),
            None => d.clone(),
        },
        Step::Duplicate(i) => match pick(&panel_ids, i) {
            Some(id) => duplicate_panel(d, id),
            None => d.clone(),
        },
        Step::ToggleRow { pick: i, collapsed } => match pick(&row_ids, i) {
            Some(id) => toggle_row_collapsed(d, id, *collapsed),
            None => d.clone(),
        },
        Step::PackRow(i) => match pick(&row_ids, i) {
            Some(id) => pack_row(d, id),
            None => d.clone(),
        },
        Step::MoveRow { pick: i, y } => match pick(&row_ids, i) {
            Some(id) => move_row(d, id, *y),
            None => d.clone(),
        },
    }
}

proptest! {
    #[test]
    fn edit_sequences_keep_layout_valid(
        input in resolved_panels(10),
        split in 2i32..16,
        steps in proptest::collection::vec(step_strategy(), 1..24),
    ) {
        let mut d = with_rows(input, split);
        prop_assert!(check(&d).is_empty(), "violations: {:?}", check(&d));

        for step in &steps {
            let before = sorted_ids(&d);
            d = apply_step(&d, step);
            prop_assert!(check(&d).is_empty(), "after {:?}: {:?}", step, check(&d));
            if step.keeps_panels() {
                prop_assert_eq!(sorted_ids(&d), before, "panels changed by {:?}", step);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Row edit determinism
// ═════════════════════════════════════════════════════════════════════════

fn row_edits(d: &Dashboard, spec: &PanelSpec, row: PanelId, collapse: bool, to_y: i32) -> Dashboard {
    let d = place_new_panel(d, spec);
    let d = toggle_row_collapsed(&d, row, collapse);
    let d = move_row(&d, row, to_y);
    let d = reorder_rows(&d, &[2000, 1000]);
    pack_row(&d, row)
}

proptest! {
    #[test]
    fn row_edits_are_deterministic(
        input in resolved_panels(10),
        split in 2i32..16,
        kind in prop::sample::select(ADD_KINDS),
        into_first in any::<bool>(),
        hint in hint_strategy(),
        collapse in any::<bool>(),
        to_y in 0i32..30,
    ) {
        let d = with_rows(input, split);
        let row = if into_first { 1000 } else { 2000 };
        let mut spec = PanelSpec::new(kind);
        spec.hint = hint;
        spec.target = PanelTarget::Row(row);

        let a = serde_json::to_string(&row_edits(&d, &spec, row, collapse, to_y)).unwrap();
        let b = serde_json::to_string(&row_edits(&d, &spec, row, collapse, to_y)).unwrap();
        prop_assert_eq!(a, b);
    }
}
