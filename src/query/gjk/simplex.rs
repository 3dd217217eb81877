//! Simplices and the projection of the origin onto them.

use crate::math::{Real, Vector};

#[cfg(not(feature = "std"))]
use na::ComplexField; // for .sqrt()

/// A vertex of a simplex living on the boundary of a Minkowski difference.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimplexVertex {
    /// The normalized search direction the vertex was computed from.
    pub d: Vector<Real>,
    /// The support point of the Minkowski difference along `self.d`.
    pub w: Vector<Real>,
}

impl Default for SimplexVertex {
    fn default() -> Self {
        SimplexVertex {
            d: Vector::zeros(),
            w: Vector::zeros(),
        }
    }
}

/// A simplex with 0 to 4 vertices and the barycentric weight of each vertex.
///
/// The vertices are indices into the vertex storage of the engine owning the
/// simplex. Only the first `self.rank()` entries are meaningful.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Simplex {
    pub(crate) vertices: [usize; 4],
    pub(crate) weights: [Real; 4],
    pub(crate) rank: usize,
}

impl Simplex {
    /// The number of vertices of this simplex.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The storage index of the `i`-th vertex.
    #[inline]
    pub fn vertex_id(&self, i: usize) -> usize {
        self.vertices[i]
    }

    /// The barycentric weight of the `i`-th vertex.
    #[inline]
    pub fn weight(&self, i: usize) -> Real {
        self.weights[i]
    }

    /// The barycentric weights of the active vertices.
    #[inline]
    pub fn weights(&self) -> &[Real] {
        &self.weights[..self.rank]
    }

    pub(crate) fn push(&mut self, vertex_id: usize, weight: Real) {
        self.vertices[self.rank] = vertex_id;
        self.weights[self.rank] = weight;
        self.rank += 1;
    }
}

/// The projection of the origin onto a simplex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OriginProjection {
    /// The squared distance between the origin and its projection.
    pub sqdist: Real,
    /// The barycentric coordinates of the projection.
    ///
    /// Entries of vertices absent from `self.mask` are zero.
    pub weights: [Real; 4],
    /// Bit `i` is set iff. the `i`-th vertex of the simplex contributes to the projection.
    pub mask: u8,
}

impl OriginProjection {
    fn on_vertex(weights: [Real; 4], mask: u8, sqdist: Real) -> Self {
        OriginProjection {
            sqdist,
            weights,
            mask,
        }
    }
}

/// The determinant of the matrix with columns `a`, `b`, `c`.
#[inline]
pub(crate) fn det(a: &Vector<Real>, b: &Vector<Real>, c: &Vector<Real>) -> Real {
    a.dot(&b.cross(c))
}

/// Projects the origin onto the segment `[a, b]`.
///
/// Returns `None` if the segment is degenerate.
pub fn project_origin_segment(a: &Vector<Real>, b: &Vector<Real>) -> Option<OriginProjection> {
    let d = b - a;
    let l = d.norm_squared();

    if l <= 0.0 {
        return None;
    }

    let t = -a.dot(&d) / l;

    if t >= 1.0 {
        Some(OriginProjection::on_vertex(
            [0.0, 1.0, 0.0, 0.0],
            0b10,
            b.norm_squared(),
        ))
    } else if t <= 0.0 {
        Some(OriginProjection::on_vertex(
            [1.0, 0.0, 0.0, 0.0],
            0b01,
            a.norm_squared(),
        ))
    } else {
        Some(OriginProjection {
            sqdist: (a + d * t).norm_squared(),
            weights: [1.0 - t, t, 0.0, 0.0],
            mask: 0b11,
        })
    }
}

/// Projects the origin onto the triangle `(a, b, c)`.
///
/// Returns `None` if the triangle is degenerate.
pub fn project_origin_triangle(
    a: &Vector<Real>,
    b: &Vector<Real>,
    c: &Vector<Real>,
) -> Option<OriginProjection> {
    const NEXT: [usize; 3] = [1, 2, 0];
    let vt = [a, b, c];
    let dl = [a - b, b - c, c - a];
    let n = dl[0].cross(&dl[1]);
    let l = n.norm_squared();

    if l <= 0.0 {
        return None;
    }

    let mut best: Option<OriginProjection> = None;

    // The origin lies outside of the edge `i`: the projection is on that edge or on one
    // of its endpoints.
    for i in 0..3 {
        if vt[i].dot(&dl[i].cross(&n)) > 0.0 {
            let j = NEXT[i];

            if let Some(sub) = project_origin_segment(vt[i], vt[j]) {
                if best.map(|b| sub.sqdist < b.sqdist).unwrap_or(true) {
                    let mut weights = [0.0; 4];
                    weights[i] = sub.weights[0];
                    weights[j] = sub.weights[1];
                    let mask = (if sub.mask & 1 != 0 { 1 << i } else { 0 })
                        + (if sub.mask & 2 != 0 { 1 << j } else { 0 });
                    best = Some(OriginProjection {
                        sqdist: sub.sqdist,
                        weights,
                        mask,
                    });
                }
            }
        }
    }

    if best.is_none() {
        let d = a.dot(&n);
        let s = l.sqrt();
        let p = n * (d / l);
        let w0 = dl[1].cross(&(b - p)).norm() / s;
        let w1 = dl[2].cross(&(c - p)).norm() / s;
        best = Some(OriginProjection {
            sqdist: p.norm_squared(),
            weights: [w0, w1, 1.0 - (w0 + w1), 0.0],
            mask: 0b111,
        });
    }

    best
}

/// Projects the origin onto the tetrahedron `(a, b, c, d)`.
///
/// Returns `None` if the tetrahedron is degenerate or if the origin lies on the same
/// side of the face `(a, b, c)` as the vertex `d`, i.e., if `d` cannot be part of
/// a valid reduction.
pub fn project_origin_tetrahedron(
    a: &Vector<Real>,
    b: &Vector<Real>,
    c: &Vector<Real>,
    d: &Vector<Real>,
) -> Option<OriginProjection> {
    const NEXT: [usize; 3] = [1, 2, 0];
    let vt = [a, b, c, d];
    let dl = [a - d, b - d, c - d];
    let vl = det(&dl[0], &dl[1], &dl[2]);
    let ng = vl * a.dot(&(b - c).cross(&(a - b))) <= 0.0;

    if !ng || vl.abs() <= 0.0 {
        return None;
    }

    let mut best: Option<OriginProjection> = None;

    // Test the three faces adjacent to `d`. The face `(a, b, c)` is where `d` came from
    // so the origin is known not to lie beyond it.
    for i in 0..3 {
        let j = NEXT[i];
        let s = vl * d.dot(&dl[i].cross(&dl[j]));

        if s > 0.0 {
            if let Some(sub) = project_origin_triangle(vt[i], vt[j], d) {
                if best.map(|b| sub.sqdist < b.sqdist).unwrap_or(true) {
                    let mut weights = [0.0; 4];
                    weights[i] = sub.weights[0];
                    weights[j] = sub.weights[1];
                    weights[3] = sub.weights[2];
                    let mask = (if sub.mask & 1 != 0 { 1 << i } else { 0 })
                        + (if sub.mask & 2 != 0 { 1 << j } else { 0 })
                        + (if sub.mask & 4 != 0 { 8 } else { 0 });
                    best = Some(OriginProjection {
                        sqdist: sub.sqdist,
                        weights,
                        mask,
                    });
                }
            }
        }
    }

    if best.is_none() {
        // The origin is inside of the tetrahedron.
        let w0 = det(c, b, d) / vl;
        let w1 = det(a, c, d) / vl;
        let w2 = det(b, a, d) / vl;
        best = Some(OriginProjection {
            sqdist: 0.0,
            weights: [w0, w1, w2, 1.0 - (w0 + w1 + w2)],
            mask: 0b1111,
        });
    }

    best
}
