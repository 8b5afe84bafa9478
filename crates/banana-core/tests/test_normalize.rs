use approx::assert_relative_eq;
use ndarray::{Array1, Array3};

use banana_core::segment::normalize::{normalize_window, smooth_depth, soft_tissue_gate};
use banana_core::segment::HuRange;

fn column(values: &[f32]) -> Array3<f32> {
    Array1::from(values.to_vec())
        .into_shape_with_order((values.len(), 1, 1))
        .unwrap()
}

#[test]
fn test_normalize_window_maps_bounds() {
    let data = column(&[-1000.0, -200.0, 100.0, 400.0, 3000.0]);
    let out = normalize_window(data.view(), HuRange::new(-200.0, 400.0));

    assert_relative_eq!(out[[0, 0, 0]], 0.0);
    assert_relative_eq!(out[[1, 0, 0]], 0.0);
    assert_relative_eq!(out[[2, 0, 0]], 0.5, epsilon = 1e-5);
    assert_relative_eq!(out[[3, 0, 0]], 1.0, epsilon = 1e-5);
    assert_relative_eq!(out[[4, 0, 0]], 1.0, epsilon = 1e-5);
}

#[test]
fn test_normalize_window_zero_width_is_finite() {
    let data = column(&[-10.0, 0.0, 10.0]);
    let out = normalize_window(data.view(), HuRange::new(0.0, 0.0));
    assert!(out.iter().all(|v| v.is_finite() && *v >= 0.0 && *v <= 1.0));
}

#[test]
fn test_soft_tissue_gate_inclusive() {
    let data = column(&[-251.0, -250.0, 0.0, 200.0, 201.0]);
    let gate = soft_tissue_gate(data.view(), HuRange::new(-250.0, 200.0));
    let values: Vec<bool> = gate.iter().copied().collect();
    assert_eq!(values, vec![false, true, true, true, false]);
}

#[test]
fn test_smooth_depth_k1_identity() {
    let data = column(&[0.1, 0.9, 0.3]);
    assert_eq!(smooth_depth(data.view(), 1), data);
    assert_eq!(smooth_depth(data.view(), 0), data);
}

#[test]
fn test_smooth_depth_odd_width() {
    let data = column(&[0.0, 0.0, 0.9, 0.0, 0.0]);
    let out = smooth_depth(data.view(), 3);
    assert_eq!(out.dim(), data.dim());
    assert_relative_eq!(out[[0, 0, 0]], 0.0);
    assert_relative_eq!(out[[1, 0, 0]], 0.3, epsilon = 1e-6);
    assert_relative_eq!(out[[2, 0, 0]], 0.3, epsilon = 1e-6);
    assert_relative_eq!(out[[3, 0, 0]], 0.3, epsilon = 1e-6);
    assert_relative_eq!(out[[4, 0, 0]], 0.0);
}

#[test]
fn test_smooth_depth_edges_replicated() {
    let data = column(&[0.6, 0.0, 0.0]);
    let out = smooth_depth(data.view(), 3);
    // Window at z = 0 is [0.6, 0.6, 0.0].
    assert_relative_eq!(out[[0, 0, 0]], 0.4, epsilon = 1e-6);
    assert_relative_eq!(out[[1, 0, 0]], 0.2, epsilon = 1e-6);
}

#[test]
fn test_smooth_depth_even_width_keeps_depth() {
    let data = column(&[0.0, 0.4, 0.8, 0.4]);
    let out = smooth_depth(data.view(), 2);
    assert_eq!(out.dim(), (4, 1, 1));
    // One slice of padding before, none after: mean of [z - 1, z].
    assert_relative_eq!(out[[0, 0, 0]], 0.0);
    assert_relative_eq!(out[[1, 0, 0]], 0.2, epsilon = 1e-6);
    assert_relative_eq!(out[[2, 0, 0]], 0.6, epsilon = 1e-6);
    assert_relative_eq!(out[[3, 0, 0]], 0.6, epsilon = 1e-6);
}

#[test]
fn test_smooth_depth_wider_than_volume() {
    let data = column(&[0.3, 0.6]);
    let out = smooth_depth(data.view(), 7);
    assert_eq!(out.dim(), (2, 1, 1));
    assert!(out.iter().all(|&v| (0.3..=0.6).contains(&v)));
}

#[test]
fn test_smooth_depth_constant_preserved() {
    let data = Array3::<f32>::from_elem((6, 3, 4), 0.25);
    let out = smooth_depth(data.view(), 4);
    for v in out.iter() {
        assert_relative_eq!(*v, 0.25, epsilon = 1e-6);
    }
}
