#[allow(dead_code)]
mod common;

use ndarray::{Array3, Axis};

use banana_core::segment::temporal::temporal_vote;

use common::stack_from_pattern;

fn slice_set(mask: &Array3<u8>, z: usize) -> bool {
    mask.index_axis(Axis(0), z).iter().all(|&v| v == 1)
}

fn slice_clear(mask: &Array3<u8>, z: usize) -> bool {
    mask.index_axis(Axis(0), z).iter().all(|&v| v == 0)
}

#[test]
fn test_shallow_stack_unchanged() {
    let mask = stack_from_pattern(&[true, false], 4, 4);
    assert_eq!(temporal_vote(&mask), mask);

    let single = stack_from_pattern(&[true], 4, 4);
    assert_eq!(temporal_vote(&single), single);
}

#[test]
fn test_isolated_slice_removed() {
    let mask = stack_from_pattern(&[false, false, true, false, false], 4, 4);
    let voted = temporal_vote(&mask);
    assert!(voted.iter().all(|&v| v == 0));
}

#[test]
fn test_gap_filled_by_neighbours() {
    let mask = stack_from_pattern(&[false, true, false, true, false], 4, 4);
    let voted = temporal_vote(&mask);
    assert!(slice_clear(&voted, 0));
    assert!(slice_clear(&voted, 1));
    assert!(slice_set(&voted, 2));
    assert!(slice_clear(&voted, 3));
    assert!(slice_clear(&voted, 4));
}

#[test]
fn test_three_slice_run_survives() {
    let mask = stack_from_pattern(&[false, true, true, true, false], 4, 4);
    let voted = temporal_vote(&mask);
    assert!(slice_clear(&voted, 0));
    assert!(slice_set(&voted, 1));
    assert!(slice_set(&voted, 2));
    assert!(slice_set(&voted, 3));
    assert!(slice_clear(&voted, 4));
}

#[test]
fn test_edge_slice_replicates_itself() {
    // The first slice is its own previous neighbour.
    let mask = stack_from_pattern(&[true, false, false, false], 2, 2);
    let voted = temporal_vote(&mask);
    assert!(slice_set(&voted, 0));
    assert!(slice_clear(&voted, 1));

    let mask = stack_from_pattern(&[false, false, false, true], 2, 2);
    let voted = temporal_vote(&mask);
    assert!(slice_set(&voted, 3));
    assert!(slice_clear(&voted, 2));
}

#[test]
fn test_output_is_binary_and_same_shape() {
    let mut mask = stack_from_pattern(&[true, true, false, true], 3, 5);
    mask[[0, 0, 0]] = 7;
    let voted = temporal_vote(&mask);
    assert_eq!(voted.dim(), mask.dim());
    assert!(voted.iter().all(|&v| v == 0 || v == 1));
}

#[test]
fn test_shallow_stack_vote_is_idempotent() {
    for pattern in [
        vec![true],
        vec![false],
        vec![true, false],
        vec![false, true],
        vec![true, true],
    ] {
        let mask = stack_from_pattern(&pattern, 3, 3);
        let once = temporal_vote(&mask);
        assert_eq!(once, mask, "pattern {pattern:?}");
        assert_eq!(temporal_vote(&once), once, "pattern {pattern:?}");
    }
}

#[test]
fn test_unanimous_neighbourhoods_decide_the_voxel() {
    // Every on/off pattern of a single 6-deep column.
    let depth: usize = 6;
    for bits in 0u32..(1 << depth) {
        let pattern: Vec<bool> = (0..depth).map(|z| bits & (1 << z) != 0).collect();
        let voted = temporal_vote(&stack_from_pattern(&pattern, 1, 1));

        for z in 0..depth {
            let prev = pattern[z.saturating_sub(1)];
            let next = pattern[(z + 1).min(depth - 1)];
            let window = [prev, pattern[z], next];
            if window.iter().all(|&on| on) {
                assert_eq!(voted[[z, 0, 0]], 1, "pattern {pattern:?} z={z}");
            }
            if window.iter().all(|&on| !on) {
                assert_eq!(voted[[z, 0, 0]], 0, "pattern {pattern:?} z={z}");
            }
        }
    }
}
