#[allow(dead_code)]
mod common;

use ndarray::{s, Array2, Array3, Axis};

use banana_core::segment::components::{
    label_components, prune_slices, prune_small_components, UNLABELED,
};

use common::{slice_from_pixels, slice_with_rect};

#[test]
fn test_label_empty_slice() {
    let mask = Array2::<u8>::zeros((8, 8));
    let labels = label_components(mask.view());
    assert_eq!(labels.count(), 0);
    assert!(labels.labels.iter().all(|&l| l == UNLABELED));
}

#[test]
fn test_label_two_rectangles() {
    let mut mask = slice_with_rect((10, 10), 0..3, 0..3);
    mask.slice_mut(s![5..10, 6..8]).fill(1);

    let labels = label_components(mask.view());
    assert_eq!(labels.count(), 2);
    let mut areas = labels.areas.clone();
    areas.sort_unstable();
    assert_eq!(areas, vec![9, 10]);
}

#[test]
fn test_label_areas_sum_to_foreground() {
    let mask = Array2::from_shape_fn((16, 16), |(r, c)| ((r * 7 + c * 3) % 5 < 2) as u8);
    let foreground = mask.iter().filter(|&&v| v != 0).count();

    let labels = label_components(mask.view());
    assert_eq!(labels.areas.iter().sum::<usize>(), foreground);
    let labelled = labels.labels.iter().filter(|&&l| l != UNLABELED).count();
    assert_eq!(labelled, foreground);
}

#[test]
fn test_diagonal_pixels_are_separate() {
    let mask = slice_from_pixels((3, 3), &[(0, 0), (1, 1), (2, 2)]);
    let labels = label_components(mask.view());
    assert_eq!(labels.count(), 3);
    assert!(labels.areas.iter().all(|&a| a == 1));
}

#[test]
fn test_snake_is_one_component() {
    // Serpentine path that a naive row scan would split.
    let mut mask = Array2::<u8>::zeros((5, 5));
    mask.row_mut(0).fill(1);
    mask[[1, 4]] = 1;
    mask.row_mut(2).fill(1);
    mask[[3, 0]] = 1;
    mask.row_mut(4).fill(1);

    let labels = label_components(mask.view());
    assert_eq!(labels.count(), 1);
    assert_eq!(labels.areas[0], 17);
}

#[test]
fn test_large_component_does_not_overflow() {
    let mask = Array2::<u8>::ones((512, 512));
    let labels = label_components(mask.view());
    assert_eq!(labels.count(), 1);
    assert_eq!(labels.areas[0], 512 * 512);
}

#[test]
fn test_prune_min_area_zero_is_identity() {
    let mask = slice_from_pixels((6, 6), &[(0, 0), (3, 3), (3, 4)]);
    let pruned = prune_small_components(mask.view(), 0);
    assert_eq!(pruned, mask);
}

#[test]
fn test_prune_removes_small_keeps_large() {
    let mut mask = slice_with_rect((20, 20), 0..10, 0..10); // 100 px
    mask.slice_mut(s![15..17, 15..17]).fill(1); // 4 px

    let pruned = prune_small_components(mask.view(), 80);
    assert_eq!(pruned.iter().filter(|&&v| v != 0).count(), 100);
    assert_eq!(pruned[[15, 15]], 0);
    assert_eq!(pruned[[5, 5]], 1);
}

#[test]
fn test_prune_keeps_component_at_exact_min_area() {
    let mask = slice_with_rect((10, 10), 2..6, 2..6); // 16 px
    let kept = prune_small_components(mask.view(), 16);
    assert_eq!(kept, mask);
    let removed = prune_small_components(mask.view(), 17);
    assert!(removed.iter().all(|&v| v == 0));
}

#[test]
fn test_prune_output_is_binary() {
    let mut mask = slice_with_rect((8, 8), 0..4, 0..4);
    mask[[0, 0]] = 255;
    let pruned = prune_small_components(mask.view(), 2);
    assert!(pruned.iter().all(|&v| v == 0 || v == 1));
}

#[test]
fn test_prune_never_adds_pixels() {
    let mask = Array2::from_shape_fn((32, 32), |(r, c)| ((r * 13 + c * 5) % 7 < 3) as u8);
    for min_area in [1, 2, 5, 20, 1000] {
        let pruned = prune_small_components(mask.view(), min_area);
        for (p, m) in pruned.iter().zip(mask.iter()) {
            assert!(*p <= *m);
        }
    }
}

#[test]
fn test_prune_slices_is_per_slice() {
    let mut mask = Array3::<u8>::zeros((3, 10, 10));
    mask.slice_mut(s![0, 0..5, 0..5]).fill(1); // 25 px
    mask.slice_mut(s![1, 0..2, 0..2]).fill(1); // 4 px
    mask.slice_mut(s![2, 0..3, 0..3]).fill(1); // 9 px

    let pruned = prune_slices(&mask, 9);
    assert_eq!(pruned.index_axis(Axis(0), 0), mask.index_axis(Axis(0), 0));
    assert!(pruned.index_axis(Axis(0), 1).iter().all(|&v| v == 0));
    assert_eq!(pruned.index_axis(Axis(0), 2), mask.index_axis(Axis(0), 2));
}

#[test]
fn test_prune_slices_parallel_matches_sequential() {
    // 6 slices of 64x64 takes the parallel path.
    let mask = Array3::from_shape_fn((6, 64, 64), |(z, r, c)| {
        ((r * 31 + c * 17 + z * 7) % 11 < 4) as u8
    });

    let pruned = prune_slices(&mask, 3);
    for z in 0..6 {
        let expected = prune_small_components(mask.index_axis(Axis(0), z), 3);
        assert_eq!(pruned.index_axis(Axis(0), z), expected.view());
    }
}
