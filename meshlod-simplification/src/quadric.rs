//! Quadric error accumulator
//!
//! A quadric is the symmetric 4x4 matrix `Q` such that `vᵗQv` (with
//! `v = [x, y, z, 1]`) is the sum of squared distances from the point to a
//! set of planes. Only the upper triangle is stored:
//!
//! ```text
//! | m0 m1 m2 m3 |
//! | m1 m4 m5 m6 |
//! | m2 m5 m7 m8 |
//! | m3 m6 m8 m9 |
//! ```

use meshlod_core::{Point3d, Vector3d};
use std::ops::{Add, AddAssign, Index};

/// Determinant magnitude below which the optimal-point system is treated as singular
pub const DEFAULT_SINGULAR_EPSILON: f64 = 1e-10;

/// Symmetric 4x4 matrix stored as its 10 independent coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SymmetricMatrix {
    m: [f64; 10],
}

impl SymmetricMatrix {
    /// The zero quadric
    pub const fn zero() -> Self {
        Self { m: [0.0; 10] }
    }

    /// Build a matrix from its coefficients in storage order
    pub const fn new(m: [f64; 10]) -> Self {
        Self { m }
    }

    /// Outer product `ppᵗ` of the plane `p = [a, b, c, d]` (`ax + by + cz + d = 0`).
    ///
    /// `(a, b, c)` should be unit length so the quadric measures squared distance.
    pub fn from_plane(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            m: [
                a * a, a * b, a * c, a * d,
                       b * b, b * c, b * d,
                              c * c, c * d,
                                     d * d,
            ],
        }
    }

    /// Plane quadric of the triangle `(p0, p1, p2)`.
    ///
    /// Degenerate (zero-area) triangles have no plane and contribute nothing.
    pub fn from_triangle(p0: &Point3d, p1: &Point3d, p2: &Point3d) -> Self {
        let normal: Option<Vector3d> = (p1 - p0).cross(&(p2 - p0)).try_normalize(0.0);
        match normal {
            Some(n) if n.iter().all(|c| c.is_finite()) => {
                let d = -n.dot(&p0.coords);
                Self::from_plane(n.x, n.y, n.z, d)
            }
            _ => Self::zero(),
        }
    }

    /// Raw coefficients in storage order
    pub fn coefficients(&self) -> &[f64; 10] {
        &self.m
    }

    /// Determinant of the 3x3 matrix assembled from nine coefficient indices (row major).
    #[allow(clippy::too_many_arguments)]
    pub fn det(
        &self,
        a11: usize, a12: usize, a13: usize,
        a21: usize, a22: usize, a23: usize,
        a31: usize, a32: usize, a33: usize,
    ) -> f64 {
        let m = &self.m;
        m[a11] * m[a22] * m[a33] + m[a13] * m[a21] * m[a32] + m[a12] * m[a23] * m[a31]
            - m[a13] * m[a22] * m[a31]
            - m[a11] * m[a23] * m[a32]
            - m[a12] * m[a21] * m[a33]
    }

    /// Evaluate `vᵗQv` for `v = [x, y, z, 1]`.
    pub fn evaluate(&self, p: &Point3d) -> f64 {
        let m = &self.m;
        let (x, y, z) = (p.x, p.y, p.z);

        m[0] * x * x
            + 2.0 * m[1] * x * y
            + 2.0 * m[2] * x * z
            + 2.0 * m[3] * x
            + m[4] * y * y
            + 2.0 * m[5] * y * z
            + 2.0 * m[6] * y
            + m[7] * z * z
            + 2.0 * m[8] * z
            + m[9]
    }

    /// Solve for the point where the gradient of the quadric vanishes.
    ///
    /// Returns `None` when the system determinant is below `epsilon`.
    pub fn solve(&self, epsilon: f64) -> Option<Point3d> {
        let det = self.det(0, 1, 2, 1, 4, 5, 2, 5, 7);
        if det.abs() < epsilon {
            return None;
        }

        let x = -self.det(1, 2, 3, 4, 5, 6, 5, 7, 8) / det;
        let y = self.det(0, 2, 3, 1, 5, 6, 2, 7, 8) / det;
        let z = -self.det(0, 1, 3, 1, 4, 6, 2, 5, 8) / det;
        Some(Point3d::new(x, y, z))
    }

    /// Best collapse target for an edge `(p0, p1)` under this (combined) quadric
    /// and the error it incurs.
    ///
    /// Uses the algebraic solution when the system is well conditioned, otherwise
    /// the lowest-error candidate among `p0`, `p1` and their midpoint.
    pub fn optimal_point(&self, p0: &Point3d, p1: &Point3d, epsilon: f64) -> (Point3d, f64) {
        if let Some(p) = self.solve(epsilon) {
            return (p, self.evaluate(&p));
        }

        let mid = nalgebra::center(p0, p1);
        let mut best = (*p0, self.evaluate(p0));
        for candidate in [*p1, mid] {
            let error = self.evaluate(&candidate);
            if error < best.1 {
                best = (candidate, error);
            }
        }
        best
    }
}

impl Add for SymmetricMatrix {
    type Output = SymmetricMatrix;

    fn add(mut self, other: SymmetricMatrix) -> SymmetricMatrix {
        self += other;
        self
    }
}

impl AddAssign for SymmetricMatrix {
    fn add_assign(&mut self, other: SymmetricMatrix) {
        for (a, b) in self.m.iter_mut().zip(other.m.iter()) {
            *a += b;
        }
    }
}

impl Index<usize> for SymmetricMatrix {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.m[index]
    }
}
