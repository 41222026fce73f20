// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The 2x2 complex Jones matrix.
//!
//! Elements are stored in row-major order, i.e. `[j00, j01, j10, j11]`. All
//! operations are pure; only [`JonesMatrix::inv`] can fail.

mod error;

pub use error::JonesError;

use std::ops::{Index, Mul};

use num_complex::Complex64 as c64;

/// The tolerance used by [`JonesMatrix::inv`]. The magnitude of the determinant
/// is compared against this value scaled by the squared Frobenius norm of the
/// matrix, so that the test doesn't depend on the overall scale of the matrix.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// A 2x2 complex matrix describing how a linear system transforms the two
/// polarisation components of an electromagnetic wave.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct JonesMatrix([c64; 4]);

impl JonesMatrix {
    /// Create a new [`JonesMatrix`] from its four elements in row-major order.
    pub const fn new(j00: c64, j01: c64, j10: c64, j11: c64) -> JonesMatrix {
        JonesMatrix([j00, j01, j10, j11])
    }

    /// The identity matrix.
    pub const fn identity() -> JonesMatrix {
        JonesMatrix([
            c64::new(1.0, 0.0),
            c64::new(0.0, 0.0),
            c64::new(0.0, 0.0),
            c64::new(1.0, 0.0),
        ])
    }

    /// A matrix of zeros.
    pub const fn zeros() -> JonesMatrix {
        JonesMatrix([c64::new(0.0, 0.0); 4])
    }

    /// A diagonal matrix.
    pub const fn diag(j00: c64, j11: c64) -> JonesMatrix {
        JonesMatrix([j00, c64::new(0.0, 0.0), c64::new(0.0, 0.0), j11])
    }

    /// A real rotation matrix `[[cos, -sin], [sin, cos]]`.
    pub fn rotation(angle_rad: f64) -> JonesMatrix {
        let (s, c) = angle_rad.sin_cos();
        JonesMatrix::from([c, -s, s, c])
    }

    /// Get the elements in row-major order.
    pub const fn to_array(self) -> [c64; 4] {
        self.0
    }

    /// Get an iterator over the elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, c64> {
        self.0.iter()
    }

    /// The Hermitian (conjugate) transpose.
    pub fn h(&self) -> JonesMatrix {
        let j = &self.0;
        JonesMatrix([j[0].conj(), j[2].conj(), j[1].conj(), j[3].conj()])
    }

    /// The determinant.
    pub fn det(&self) -> c64 {
        let j = &self.0;
        j[0] * j[3] - j[1] * j[2]
    }

    /// The trace.
    pub fn trace(&self) -> c64 {
        self.0[0] + self.0[3]
    }

    /// The squared Frobenius norm (sum of the squared magnitudes of all
    /// elements).
    pub fn norm_sqr(&self) -> f64 {
        self.0.iter().map(|j| j.norm_sqr()).sum()
    }

    /// The inverse. Fails with [`JonesError::Singular`] if the determinant is
    /// (relatively) too small; a pseudo-inverse is never substituted.
    pub fn inv(&self) -> Result<JonesMatrix, JonesError> {
        let det = self.det();
        let tolerance = SINGULAR_TOLERANCE * self.norm_sqr();
        // A zero matrix has a zero tolerance; `<=` catches it.
        if det.norm() <= tolerance || det.norm().is_nan() {
            return Err(JonesError::Singular {
                det: det.norm(),
                tolerance,
            });
        }
        let inv_det = det.inv();
        let j = &self.0;
        Ok(JonesMatrix([
            j[3] * inv_det,
            -j[1] * inv_det,
            -j[2] * inv_det,
            j[0] * inv_det,
        ]))
    }

    /// Are all of the elements of `self` and `other` within `epsilon` of each
    /// other?
    pub fn approx_eq(&self, other: &JonesMatrix, epsilon: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).norm() <= epsilon)
    }

    /// Are any of the elements NaN or infinite?
    pub fn any_nan(&self) -> bool {
        self.0.iter().any(|j| !j.re.is_finite() || !j.im.is_finite())
    }
}

impl From<[c64; 4]> for JonesMatrix {
    fn from(j: [c64; 4]) -> Self {
        Self(j)
    }
}

impl From<[f64; 4]> for JonesMatrix {
    fn from(j: [f64; 4]) -> Self {
        Self(j.map(|re| c64::new(re, 0.0)))
    }
}

/// Interleaved real and imaginary parts, in row-major order.
impl From<[f64; 8]> for JonesMatrix {
    fn from(j: [f64; 8]) -> Self {
        Self([
            c64::new(j[0], j[1]),
            c64::new(j[2], j[3]),
            c64::new(j[4], j[5]),
            c64::new(j[6], j[7]),
        ])
    }
}

impl From<marlu::Jones<f64>> for JonesMatrix {
    fn from(j: marlu::Jones<f64>) -> Self {
        Self([j[0], j[1], j[2], j[3]])
    }
}

impl From<JonesMatrix> for marlu::Jones<f64> {
    fn from(j: JonesMatrix) -> Self {
        marlu::Jones::from(j.0)
    }
}

impl Index<usize> for JonesMatrix {
    type Output = c64;

    fn index(&self, index: usize) -> &c64 {
        &self.0[index]
    }
}

/// Matrix multiplication `self · rhs`. This is not commutative.
impl Mul for JonesMatrix {
    type Output = JonesMatrix;

    fn mul(self, rhs: JonesMatrix) -> JonesMatrix {
        let a = &self.0;
        let b = &rhs.0;
        JonesMatrix([
            a[0] * b[0] + a[1] * b[2],
            a[0] * b[1] + a[1] * b[3],
            a[2] * b[0] + a[3] * b[2],
            a[2] * b[1] + a[3] * b[3],
        ])
    }
}

impl Mul<&JonesMatrix> for &JonesMatrix {
    type Output = JonesMatrix;

    fn mul(self, rhs: &JonesMatrix) -> JonesMatrix {
        *self * *rhs
    }
}

impl Mul<c64> for JonesMatrix {
    type Output = JonesMatrix;

    fn mul(self, rhs: c64) -> JonesMatrix {
        JonesMatrix(self.0.map(|j| j * rhs))
    }
}

impl Mul<f64> for JonesMatrix {
    type Output = JonesMatrix;

    fn mul(self, rhs: f64) -> JonesMatrix {
        JonesMatrix(self.0.map(|j| j * rhs))
    }
}

impl std::fmt::Display for JonesMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "[[{:e}{:+e}j, {:e}{:+e}j] [{:e}{:+e}j, {:e}{:+e}j]]",
            self[0].re,
            self[0].im,
            self[1].re,
            self[1].im,
            self[2].re,
            self[2].im,
            self[3].re,
            self[3].im,
        )
    }
}

impl std::fmt::Debug for JonesMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(any(test, feature = "approx"))]
impl approx::AbsDiffEq for JonesMatrix {
    type Epsilon = f64;

    #[inline]
    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(s, o)| approx::AbsDiffEq::abs_diff_eq(s, o, epsilon))
    }
}

#[cfg(any(test, feature = "approx"))]
impl approx::RelativeEq for JonesMatrix {
    #[inline]
    fn default_max_relative() -> f64 {
        f64::EPSILON
    }

    #[inline]
    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(s, o)| {
            approx::RelativeEq::relative_eq(&s.re, &o.re, epsilon, max_relative)
                && approx::RelativeEq::relative_eq(&s.im, &o.im, epsilon, max_relative)
        })
    }
}
