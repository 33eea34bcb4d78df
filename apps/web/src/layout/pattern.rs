//! Pattern pass: breaks up runs of portrait blocks before packing.
//!
//! Three portraits in a row produce a tall, narrow strip that reads as a
//! column rather than a row. When such a run is found, the first landscape
//! (or square) block within the look-ahead window is pulled forward into the
//! third slot. This is an aesthetic pass only; the packer is correct without it.
//!
//! Hero and cover blocks are barriers: nothing is moved across them.

use crate::layout::engine::LayoutItem;

const RUN_LENGTH: usize = 3;

/// Reorders `sequence` in place.
///
/// `window` is how many positions from the start of a run are inspected;
/// `max_movement` bounds how far any block may end up from the index it had
/// on entry.
pub(crate) fn apply_pattern_pass(
    sequence: &mut [&LayoutItem],
    window: usize,
    max_movement: usize,
) {
    let len = sequence.len();
    if max_movement == 0 || window <= RUN_LENGTH || len <= RUN_LENGTH {
        return;
    }

    // origin[k] = index the block now at position k had on entry.
    let mut origin: Vec<usize> = (0..len).collect();

    for start in 0..=(len - RUN_LENGTH) {
        let run = &sequence[start..start + RUN_LENGTH];
        if !run.iter().all(|item| item.packs() && item.is_portrait()) {
            continue;
        }

        let target = start + RUN_LENGTH - 1;
        let horizon = (start + window).min(len);
        let candidate = (target + 1..horizon)
            .take_while(|&j| sequence[j].packs())
            .find(|&j| !sequence[j].is_portrait());

        if let Some(from) = candidate {
            if within_movement(&origin, target, from, max_movement) {
                sequence[target..=from].rotate_right(1);
                origin[target..=from].rotate_right(1);
            }
        }
    }
}

/// Moving `from` to `target` shifts every block in `target..from` one step right.
fn within_movement(origin: &[usize], target: usize, from: usize, max_movement: usize) -> bool {
    origin[from].abs_diff(target) <= max_movement
        && (target..from).all(|k| origin[k].abs_diff(k + 1) <= max_movement)
}
