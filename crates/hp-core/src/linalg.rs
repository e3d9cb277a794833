//! Fixed-size 2x2 / 2x1 linear algebra.
//!
//! Every system in the kernel has exactly two nodes, so these are written out
//! by hand: Cramer's rule for solves, closed-form inverse, no allocation.

use core::ops::{Add, Index, IndexMut, Sub};

use crate::error::{CoreError, CoreResult};
use crate::numeric::Real;

/// Column vector of length two.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Vec2(pub [Real; 2]);

impl Vec2 {
    #[inline]
    pub const fn new(a: Real, b: Real) -> Self {
        Self([a, b])
    }

    /// Vector with `v` in the first slot and zero in the second.
    #[inline]
    pub const fn first(v: Real) -> Self {
        Self([v, 0.0])
    }

    #[inline]
    pub fn scale(self, s: Real) -> Self {
        Self([self.0[0] * s, self.0[1] * s])
    }
}

impl Index<usize> for Vec2 {
    type Output = Real;
    fn index(&self, i: usize) -> &Real {
        &self.0[i]
    }
}

impl IndexMut<usize> for Vec2 {
    fn index_mut(&mut self, i: usize) -> &mut Real {
        &mut self.0[i]
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1]])
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2([self.0[0] - rhs.0[0], self.0[1] - rhs.0[1]])
    }
}

/// Row-major 2x2 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat2(pub [[Real; 2]; 2]);

impl Mat2 {
    #[inline]
    pub const fn new(rows: [[Real; 2]; 2]) -> Self {
        Self(rows)
    }

    #[inline]
    pub const fn diag(a: Real, b: Real) -> Self {
        Self([[a, 0.0], [0.0, b]])
    }

    #[inline]
    pub fn det(&self) -> Real {
        let [[a, b], [c, d]] = self.0;
        a * d - b * c
    }

    #[inline]
    pub fn mul_vec(&self, v: Vec2) -> Vec2 {
        let [[a, b], [c, d]] = self.0;
        Vec2([a * v.0[0] + b * v.0[1], c * v.0[0] + d * v.0[1]])
    }

    pub fn column(&self, j: usize) -> Vec2 {
        Vec2([self.0[0][j], self.0[1][j]])
    }

    /// Copy of `self` with column `j` replaced by `v`.
    pub fn with_column(&self, j: usize, v: Vec2) -> Mat2 {
        let mut out = *self;
        out.0[0][j] = v.0[0];
        out.0[1][j] = v.0[1];
        out
    }

    fn scale_ref(&self) -> Real {
        self.0
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, x| acc.max(x.abs()))
    }

    fn check_regular(&self, what: &'static str) -> CoreResult<Real> {
        let det = self.det();
        let scale = self.scale_ref();
        if !det.is_finite() || det.abs() <= Real::EPSILON * scale * scale {
            return Err(CoreError::Singular { what, det });
        }
        Ok(det)
    }

    pub fn inverse(&self, what: &'static str) -> CoreResult<Mat2> {
        let det = self.check_regular(what)?;
        let [[a, b], [c, d]] = self.0;
        Ok(Mat2([[d / det, -b / det], [-c / det, a / det]]))
    }

    /// Solve `self * x = rhs` by Cramer's rule.
    pub fn solve(&self, rhs: Vec2, what: &'static str) -> CoreResult<Vec2> {
        let det = self.check_regular(what)?;
        let [[a, b], [c, d]] = self.0;
        let [r0, r1] = rhs.0;
        Ok(Vec2([(r0 * d - b * r1) / det, (a * r1 - c * r0) / det]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Real, b: Real) -> bool {
        (a - b).abs() < 1e-10 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn solve_matches_mul_vec() {
        let m = Mat2::new([[170.0, -100.0], [-100.0, 200.0]]);
        let x = Vec2::new(293.15, 286.575);
        let b = m.mul_vec(x);
        let back = m.solve(b, "test").unwrap();
        assert!(close(back[0], x[0]));
        assert!(close(back[1], x[1]));
    }

    #[test]
    fn inverse_of_diag() {
        let c = Mat2::diag(2.0e6, 1.0e7);
        let inv = c.inverse("C").unwrap();
        assert_eq!(inv.0[0][0], 1.0 / 2.0e6);
        assert_eq!(inv.0[1][1], 1.0 / 1.0e7);
        assert_eq!(inv.0[0][1], 0.0);
        assert_eq!(inv.0[1][0], 0.0);
    }

    #[test]
    fn inverse_times_self_is_identity() {
        let m = Mat2::new([[3.0, 1.0], [2.0, 4.0]]);
        let inv = m.inverse("m").unwrap();
        let e0 = m.mul_vec(inv.column(0));
        let e1 = m.mul_vec(inv.column(1));
        assert!(close(e0[0], 1.0));
        assert!(close(e1[1], 1.0));
        assert!(e0[1].abs() < 1e-15);
        assert!(e1[0].abs() < 1e-15);
    }

    #[test]
    fn singular_is_rejected() {
        let m = Mat2::new([[1.0, 2.0], [2.0, 4.0]]);
        let err = m.solve(Vec2::new(1.0, 1.0), "rank one").unwrap_err();
        assert!(matches!(err, CoreError::Singular { what: "rank one", .. }));
        assert!(Mat2::diag(0.0, 0.0).inverse("zero").is_err());
    }

    #[test]
    fn column_replacement() {
        let m = Mat2::new([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m.column(0), Vec2::new(1.0, 3.0));
        let r = m.with_column(0, Vec2::new(-1.0, 0.0));
        assert_eq!(r, Mat2::new([[-1.0, 2.0], [0.0, 4.0]]));
        // receiver untouched
        assert_eq!(m.0[0][0], 1.0);
    }

    #[test]
    fn vector_ops() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(0.5, -1.0);
        assert_eq!(a + b, Vec2::new(1.5, 1.0));
        assert_eq!(a - b, Vec2::new(0.5, 3.0));
        assert_eq!(a.scale(2.0), Vec2::new(2.0, 4.0));
        assert_eq!(Vec2::first(7.0), Vec2::new(7.0, 0.0));
    }
}
