//! The Gilbert-Johnson-Keerthi distance algorithm.
//!
//! GJK operates on the Minkowski difference of two convex shapes. It maintains a simplex
//! of at most four support points and repeatedly replaces it by the smallest sub-simplex
//! containing the point closest to the origin, until either:
//!
//! - no support point makes enough progress toward the origin: the shapes are separated
//!   and the norm of the current ray is their distance ([`GjkStatus::Valid`]),
//! - the simplex encloses the origin: the shapes overlap ([`GjkStatus::Inside`]),
//! - the iteration budget is exhausted ([`GjkStatus::Failed`]).
//!
//! When the shapes overlap, [`GJK::enclose_origin`] grows the terminal simplex into a
//! tetrahedron so it can seed the Expanding Polytope Algorithm.

use arrayvec::ArrayVec;

use crate::math::{Real, Vector};
use crate::query::gjk::{
    det, project_origin_segment, project_origin_tetrahedron, project_origin_triangle,
    MinkowskiDiff, OriginProjection, Simplex, SimplexVertex,
};
use crate::shape::SupportMap;

#[cfg(not(feature = "std"))]
use na::ComplexField; // for .abs()

/// The tolerance used by the termination criteria of GJK.
///
/// The progress test is relative: a run stops once the lower bound of the distance is
/// within `GJK_EPS * distance` of its upper bound, so the error of a distance grows
/// with the distance itself. A support point within `GJK_EPS.sqrt()` of the simplex
/// also stops the run, which bounds the error of short distances by a small multiple
/// of `GJK_EPS`.
#[cfg(feature = "f64")]
pub const GJK_EPS: Real = 1.0e-6;
/// The tolerance used by the termination criteria of GJK.
///
/// The progress test is relative: a run stops once the lower bound of the distance is
/// within `GJK_EPS * distance` of its upper bound.
#[cfg(feature = "f32")]
pub const GJK_EPS: Real = 1.0e-4;

/// The default iteration budget of GJK.
pub const GJK_MAX_ITERATIONS: usize = 128;

/// The terminal state of a GJK run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GjkStatus {
    /// The closest features were found: the shapes are separated or touching.
    Valid,
    /// The simplex encloses the origin: the shapes overlap.
    Inside,
    /// The iteration budget was exhausted or no simplex could be built.
    Failed,
}

/// Parameters of the GJK algorithm.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GjkOptions {
    /// The maximum number of iterations before giving up with [`GjkStatus::Failed`].
    pub max_iterations: usize,
    /// The tolerance of the termination criteria.
    pub eps: Real,
}

impl Default for GjkOptions {
    fn default() -> Self {
        GjkOptions {
            max_iterations: GJK_MAX_ITERATIONS,
            eps: GJK_EPS,
        }
    }
}

/// State of the Gilbert-Johnson-Keerthi algorithm.
///
/// A `GJK` is meant to be used for one query and discarded. Calling [`GJK::evaluate`] again
/// starts from scratch, so it can also be reused sequentially.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "f32")] {
/// use narrowphase3d::math::{Isometry, Vector};
/// use narrowphase3d::query::gjk::{GjkStatus, MinkowskiDiff, GJK};
/// use narrowphase3d::shape::Ball;
///
/// let ball = Ball::new(1.0);
/// let pos1 = Isometry::identity();
/// let pos2 = Isometry::translation(3.0, 0.0, 0.0);
/// let diff = MinkowskiDiff::new(&pos1, &ball, &pos2, &ball);
///
/// let mut gjk = GJK::new();
/// assert_eq!(gjk.evaluate(&diff, &-Vector::x()), GjkStatus::Valid);
/// assert!((gjk.distance() - 1.0).abs() < 1.0e-3);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct GJK {
    options: GjkOptions,
    store: [SimplexVertex; 4],
    free: ArrayVec<usize, 4>,
    simplices: [Simplex; 2],
    current: usize,
    ray: Vector<Real>,
    distance: Real,
    status: GjkStatus,
}

impl Default for GJK {
    fn default() -> Self {
        Self::new()
    }
}

impl GJK {
    /// Creates a GJK instance using the default options.
    pub fn new() -> Self {
        Self::with_options(GjkOptions::default())
    }

    /// Creates a GJK instance using the given options.
    pub fn with_options(options: GjkOptions) -> Self {
        GJK {
            options,
            store: [SimplexVertex::default(); 4],
            free: ArrayVec::from([0, 1, 2, 3]),
            simplices: [Simplex::default(); 2],
            current: 0,
            ray: Vector::zeros(),
            distance: 0.0,
            status: GjkStatus::Failed,
        }
    }

    /// Clears the simplex and the result of the last run.
    pub fn reset(&mut self) {
        *self = Self::with_options(self.options);
    }

    /// The options this instance runs with.
    #[inline]
    pub fn options(&self) -> &GjkOptions {
        &self.options
    }

    /// The status of the last run.
    #[inline]
    pub fn status(&self) -> GjkStatus {
        self.status
    }

    /// The distance found by the last run.
    ///
    /// This is zero unless the status is [`GjkStatus::Valid`].
    #[inline]
    pub fn distance(&self) -> Real {
        self.distance
    }

    /// The point of the simplex closest to the origin.
    #[inline]
    pub fn ray(&self) -> &Vector<Real> {
        &self.ray
    }

    /// The current simplex.
    #[inline]
    pub fn simplex(&self) -> &Simplex {
        &self.simplices[self.current]
    }

    /// The `i`-th vertex of the current simplex.
    #[inline]
    pub fn simplex_vertex(&self, i: usize) -> &SimplexVertex {
        &self.store[self.simplex().vertices[i]]
    }

    /// The vertices of the current simplex with their barycentric weights.
    pub fn simplex_vertices(&self) -> impl Iterator<Item = (&SimplexVertex, Real)> + '_ {
        let simplex = self.simplex();
        (0..simplex.rank).map(move |i| (&self.store[simplex.vertices[i]], simplex.weights[i]))
    }

    /// Runs GJK on `shape` starting from the search direction `-guess`.
    ///
    /// A zero `guess` makes the first support point computed along the x axis.
    pub fn evaluate<G1, G2>(
        &mut self,
        shape: &MinkowskiDiff<G1, G2>,
        guess: &Vector<Real>,
    ) -> GjkStatus
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        let eps = self.options.eps;
        let mut iterations = 0;
        let mut alpha: Real = 0.0;

        self.free = ArrayVec::from([0, 1, 2, 3]);
        self.simplices = [Simplex::default(); 2];
        self.current = 0;
        self.status = GjkStatus::Valid;
        self.distance = 0.0;
        self.ray = *guess;

        let first_dir = if self.ray.norm_squared() > 0.0 {
            -self.ray
        } else {
            Vector::x()
        };

        if !self.append_vertex(0, &first_dir, shape) {
            self.status = GjkStatus::Failed;
            return self.status;
        }

        self.simplices[0].weights[0] = 1.0;
        self.ray = self.store[self.simplices[0].vertices[0]].w;

        loop {
            let next = 1 - self.current;
            let rl = self.ray.norm();

            if rl < eps {
                // The origin lies on the simplex.
                self.status = GjkStatus::Inside;
                break;
            }

            let dir = -self.ray;
            if !self.append_vertex(self.current, &dir, shape) {
                self.status = GjkStatus::Failed;
                break;
            }

            let w = self.last_vertex(self.current).w;
            let simplex = &self.simplices[self.current];

            if simplex.vertices[..simplex.rank - 1]
                .iter()
                .any(|id| (w - self.store[*id].w).norm_squared() < eps)
            {
                // The new support point is already part of the simplex.
                self.remove_vertex(self.current);
                break;
            }

            let omega = self.ray.dot(&w) / rl;
            alpha = alpha.max(omega);

            if (rl - alpha) - eps * rl <= 0.0 {
                // Not enough progress toward the origin.
                self.remove_vertex(self.current);
                break;
            }

            match self.project_origin(self.current) {
                Some(proj) if proj.sqdist >= 0.0 => {
                    self.reduce(self.current, next, &proj);
                    self.current = next;

                    if proj.mask == 0b1111 {
                        self.status = GjkStatus::Inside;
                    }
                }
                _ => {
                    self.remove_vertex(self.current);
                    break;
                }
            }

            iterations += 1;

            if iterations >= self.options.max_iterations {
                log::debug!(
                    "GJK exhausted its budget of {} iterations.",
                    self.options.max_iterations
                );
                self.status = GjkStatus::Failed;
            }

            if self.status != GjkStatus::Valid {
                break;
            }
        }

        self.distance = match self.status {
            GjkStatus::Valid => self.ray.norm(),
            _ => 0.0,
        };

        self.status
    }

    /// Grows the current simplex into a non-degenerate tetrahedron.
    ///
    /// New vertices are searched along the coordinate axes for a single point, along
    /// directions orthogonal to the segment for a segment, and along the normal of the
    /// triangle for a triangle. Returns `false` if the Minkowski difference is too flat
    /// for any of these directions to produce a tetrahedron with a non-zero volume.
    pub fn enclose_origin<G1, G2>(&mut self, shape: &MinkowskiDiff<G1, G2>) -> bool
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        let enclosed = self.enclose_origin_recursive(shape);

        if !enclosed {
            log::debug!(
                "GJK could not grow a simplex of rank {} into a tetrahedron.",
                self.simplex().rank
            );
        }

        enclosed
    }

    fn enclose_origin_recursive<G1, G2>(&mut self, shape: &MinkowskiDiff<G1, G2>) -> bool
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        match self.simplex().rank {
            1 => {
                for i in 0..3 {
                    let mut axis = Vector::zeros();
                    axis[i] = 1.0;

                    if self.try_direction(shape, &axis) || self.try_direction(shape, &-axis) {
                        return true;
                    }
                }
            }
            2 => {
                let d = self.simplex_vertex(1).w - self.simplex_vertex(0).w;

                for i in 0..3 {
                    let mut axis = Vector::zeros();
                    axis[i] = 1.0;
                    let p = d.cross(&axis);

                    if p.norm_squared() > 0.0
                        && (self.try_direction(shape, &p) || self.try_direction(shape, &-p))
                    {
                        return true;
                    }
                }
            }
            3 => {
                let w0 = self.simplex_vertex(0).w;
                let n = (self.simplex_vertex(1).w - w0).cross(&(self.simplex_vertex(2).w - w0));

                if n.norm_squared() > 0.0
                    && (self.try_direction(shape, &n) || self.try_direction(shape, &-n))
                {
                    return true;
                }
            }
            4 => {
                let w3 = self.simplex_vertex(3).w;
                let volume = det(
                    &(self.simplex_vertex(0).w - w3),
                    &(self.simplex_vertex(1).w - w3),
                    &(self.simplex_vertex(2).w - w3),
                );

                if !relative_eq!(volume, 0.0) {
                    return true;
                }
            }
            _ => {}
        }

        false
    }

    /// Appends the support point along `dir` and keeps it iff. the simplex can then be
    /// grown into a tetrahedron.
    fn try_direction<G1, G2>(
        &mut self,
        shape: &MinkowskiDiff<G1, G2>,
        dir: &Vector<Real>,
    ) -> bool
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        if !self.append_vertex(self.current, dir, shape) {
            return false;
        }

        if self.enclose_origin_recursive(shape) {
            return true;
        }

        self.remove_vertex(self.current);
        false
    }

    fn append_vertex<G1, G2>(
        &mut self,
        simplex_id: usize,
        dir: &Vector<Real>,
        shape: &MinkowskiDiff<G1, G2>,
    ) -> bool
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        let Some(vertex_id) = self.free.pop() else {
            return false;
        };

        let d = dir.normalize();
        self.store[vertex_id] = SimplexVertex {
            d,
            w: shape.support(&d),
        };
        self.simplices[simplex_id].push(vertex_id, 0.0);
        true
    }

    fn remove_vertex(&mut self, simplex_id: usize) {
        let simplex = &mut self.simplices[simplex_id];

        if simplex.rank > 0 {
            simplex.rank -= 1;
            self.free.push(simplex.vertices[simplex.rank]);
        }
    }

    fn last_vertex(&self, simplex_id: usize) -> &SimplexVertex {
        let simplex = &self.simplices[simplex_id];
        &self.store[simplex.vertices[simplex.rank - 1]]
    }

    fn project_origin(&self, simplex_id: usize) -> Option<OriginProjection> {
        let simplex = &self.simplices[simplex_id];
        let w = |i: usize| &self.store[simplex.vertices[i]].w;

        match simplex.rank {
            2 => project_origin_segment(w(0), w(1)),
            3 => project_origin_triangle(w(0), w(1), w(2)),
            4 => project_origin_tetrahedron(w(0), w(1), w(2), w(3)),
            _ => None,
        }
    }

    /// Moves the vertices of `from` selected by `proj.mask` into `to` and frees the others.
    fn reduce(&mut self, from: usize, to: usize, proj: &OriginProjection) {
        let source = self.simplices[from];
        let mut reduced = Simplex::default();
        self.ray = Vector::zeros();

        for i in 0..source.rank {
            let vertex_id = source.vertices[i];

            if proj.mask & (1 << i) != 0 {
                reduced.push(vertex_id, proj.weights[i]);
                self.ray += self.store[vertex_id].w * proj.weights[i];
            } else {
                self.free.push(vertex_id);
            }
        }

        self.simplices[from].rank = 0;
        self.simplices[to] = reduced;
    }
}
