// Push-down collision resolver: removes overlaps by only ever increasing `y`.

use gridboard_core::{Panel, PanelId};

use crate::collision::{rect_overlap, sorted_indices};

/// Upper bound on resolver passes. Hitting it is not an error: the layout
/// is returned as it stands after the last pass.
pub const MAX_PUSH_PASSES: usize = 100;

/// Resolve overlaps in `panels` by pushing panels down.
///
/// The panel identified by `moved` keeps its position. Every other panel is
/// visited in `(y, x, id)` order and, while it overlaps a panel that has
/// already settled (the moved panel or one visited earlier in the pass), is
/// moved just below the lowest bottom edge among those overlaps. Later
/// panels give way to earlier ones, so a pushed panel never jumps over a
/// panel that followed it. A pass that changes nothing ends the loop.
/// `x`, `w` and `h` are never modified.
///
/// When two panels that were not moved already overlap, the one later in
/// `(y, x, id)` order goes below the earlier one; the earlier one stays.
/// A pushed row header carries its embedded children with it.
pub fn resolve_collisions_push_down(panels: &[Panel], moved: Option<PanelId>) -> Vec<Panel> {
    let mut out = panels.to_vec();
    let order = sorted_indices(&out);
    let mut settled = vec![false; out.len()];

    for _ in 0..MAX_PUSH_PASSES {
        let mut changed = false;
        for (flag, panel) in settled.iter_mut().zip(&out) {
            *flag = Some(panel.id) == moved;
        }

        for &i in &order {
            let id = out[i].id;
            if Some(id) == moved {
                continue;
            }
            loop {
                let pos = out[i].grid_pos;
                let lowest_bottom = out
                    .iter()
                    .zip(&settled)
                    .filter(|(other, done)| **done && other.id != id)
                    .filter(|(other, _)| rect_overlap(&pos, &other.grid_pos))
                    .map(|(other, _)| other.grid_pos.bottom())
                    .max();
                match lowest_bottom {
                    Some(bottom) if bottom > pos.y => {
                        out[i].shift_y(bottom.saturating_sub(pos.y));
                        changed = true;
                    }
                    _ => break,
                }
            }
            settled[i] = true;
        }

        if !changed {
            break;
        }
    }

    out
}
