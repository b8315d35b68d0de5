//! Real spherical harmonics up to order 3.
//!
//! Terms are stored in ACN order (`index = l * (l + 1) + m`) with orthonormal
//! normalization, so integrating `Y_i * Y_j` over the sphere gives `δ_ij`.

use crate::math::Vec3;

pub const MAX_ORDER: u32 = 3;

pub fn num_coeffs_for_order(order: u32) -> usize {
    ((order + 1) * (order + 1)) as usize
}

/// ACN index of degree `l`, index `m` in `-l..=l`.
pub fn acn_index(l: u32, m: i32) -> usize {
    (l as i32 * (l as i32 + 1) + m) as usize
}

/// Value of the basis function `Y_l^m` in unit direction `direction`.
///
/// Degrees above [`MAX_ORDER`] evaluate to 0.
pub fn evaluate(l: u32, m: i32, direction: Vec3) -> f32 {
    let Vec3 { x, y, z } = direction;

    match (l, m) {
        (0, 0) => 0.282_094_8,

        (1, -1) => 0.488_602_5 * y,
        (1, 0) => 0.488_602_5 * z,
        (1, 1) => 0.488_602_5 * x,

        (2, -2) => 1.092_548_4 * x * y,
        (2, -1) => 1.092_548_4 * y * z,
        (2, 0) => 0.315_391_57 * (3.0 * z * z - 1.0),
        (2, 1) => 1.092_548_4 * x * z,
        (2, 2) => 0.546_274_2 * (x * x - y * y),

        (3, -3) => 0.590_043_6 * y * (3.0 * x * x - y * y),
        (3, -2) => 2.890_611_4 * x * y * z,
        (3, -1) => 0.457_045_8 * y * (5.0 * z * z - 1.0),
        (3, 0) => 0.373_176_33 * z * (5.0 * z * z - 3.0),
        (3, 1) => 0.457_045_8 * x * (5.0 * z * z - 1.0),
        (3, 2) => 1.445_305_7 * z * (x * x - y * y),
        (3, 3) => 0.590_043_6 * x * (x * x - 3.0 * y * y),

        _ => 0.0,
    }
}

/// Fills `coeffs[..num_coeffs_for_order(order)]` with every basis function
/// evaluated in `direction`.
pub fn project(direction: Vec3, order: u32, coeffs: &mut [f32]) {
    for l in 0..=order {
        for m in -(l as i32)..=(l as i32) {
            coeffs[acn_index(l, m)] = evaluate(l, m, direction);
        }
    }
}

/// Splits unit energy arriving from `direction` across the basis functions.
///
/// Each coefficient is `4π / (2l + 1) * Y_l^m(direction)^2`, which is never
/// negative. By the addition theorem the coefficients of every degree sum to
/// one, so term 0 always receives the full energy.
pub fn energy_weights(direction: Vec3, order: u32, weights: &mut [f32]) {
    for l in 0..=order {
        let scale = 4.0 * std::f32::consts::PI / (2 * l + 1) as f32;
        for m in -(l as i32)..=(l as i32) {
            let y = evaluate(l, m, direction);
            weights[acn_index(l, m)] = scale * y * y;
        }
    }
}
