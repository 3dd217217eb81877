//! Three-dimensional penetration depth queries using the Expanding Polytope Algorithm.
//!
//! The polytope lives in two fixed-capacity arenas: an array of face records and a
//! bounded vector of vertices. Every face record belongs to exactly one of two
//! index-linked lists: the `hull` (faces bounding the current polytope) or the `stock`
//! (free records). Exhausting either arena ends the run with a dedicated status instead
//! of allocating.

use arrayvec::ArrayVec;
use static_assertions::const_assert;

use crate::math::{Real, Vector};
use crate::query::gjk::{det, MinkowskiDiff, Simplex, SimplexVertex, GJK};
use crate::shape::SupportMap;

#[cfg(not(feature = "std"))]
use na::ComplexField; // for .sqrt()

/// The maximum number of faces of the polytope.
pub const EPA_MAX_FACES: usize = 128;
/// The maximum number of vertices of the polytope.
pub const EPA_MAX_VERTICES: usize = 64;
/// The default iteration budget of EPA.
pub const EPA_MAX_ITERATIONS: usize = 255;

/// The convergence tolerance of EPA, also the minimal area (times two) of a face.
#[cfg(feature = "f64")]
pub const EPA_EPS: Real = 1.0e-6;
/// The convergence tolerance of EPA, also the minimal area (times two) of a face.
#[cfg(feature = "f32")]
pub const EPA_EPS: Real = 1.0e-4;

/// The tolerance used to decide which side of a face plane a point lies on.
#[cfg(feature = "f64")]
pub const EPA_PLANE_EPS: Real = 1.0e-14;
/// The tolerance used to decide which side of a face plane a point lies on.
#[cfg(feature = "f32")]
pub const EPA_PLANE_EPS: Real = 1.0e-5;

const_assert!(EPA_MAX_FACES >= 4);
const_assert!(EPA_MAX_VERTICES >= 4);

/// Marks an adjacency slot not bound to any face yet.
const NO_FACE: usize = usize::MAX;

/// The state of an EPA run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EpaStatus {
    /// The expansion is in progress, or the iteration budget ran out before convergence.
    Valid,
    /// The shapes are in contact with a penetration depth below the tolerance.
    Touching,
    /// A face with a near-zero area was produced.
    Degenerated,
    /// The origin lies behind a face of the polytope.
    NonConvex,
    /// The horizon of a new vertex could not be stitched into a closed hull.
    InvalidHull,
    /// The face arena is exhausted. The best face found so far is reported.
    OutOfFaces,
    /// The vertex arena is exhausted. The best face found so far is reported.
    OutOfVertices,
    /// The polytope boundary was reached within the tolerance, or the closest face cannot be
    /// refined further without producing a degenerate or non-convex face.
    AccuracyReached,
    /// No initial tetrahedron could be built. A zero-depth result along the guess is reported.
    FallBack,
    /// EPA did not run.
    Failed,
}

impl EpaStatus {
    /// Whether the depth, normal and result of a run ending with this status can be used.
    pub fn is_usable(self) -> bool {
        matches!(
            self,
            EpaStatus::AccuracyReached
                | EpaStatus::Touching
                | EpaStatus::OutOfFaces
                | EpaStatus::OutOfVertices
                | EpaStatus::FallBack
        )
    }
}

/// Parameters of the Expanding Polytope Algorithm.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EpaOptions {
    /// The maximum number of expansions.
    pub max_iterations: usize,
    /// The convergence tolerance.
    pub eps: Real,
    /// The tolerance of the face plane side tests.
    pub plane_eps: Real,
}

impl Default for EpaOptions {
    fn default() -> Self {
        EpaOptions {
            max_iterations: EPA_MAX_ITERATIONS,
            eps: EPA_EPS,
            plane_eps: EPA_PLANE_EPS,
        }
    }
}

/// A triangular face of the polytope, as seen from outside of the EPA arena.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HullFace {
    /// The indices of the vertices of this face, counter-clockwise seen from outside.
    pub vertices: [usize; 3],
    /// The outward unit normal of this face.
    pub normal: Vector<Real>,
    /// The distance between the origin and this face.
    pub distance: Real,
}

#[derive(Copy, Clone, Debug)]
struct Face {
    normal: Vector<Real>,
    dist: Real,
    pts: [usize; 3],
    // `adj[i]` shares the edge `(pts[i], pts[(i + 1) % 3])`, as its own edge `adj_edge[i]`.
    adj: [usize; 3],
    adj_edge: [usize; 3],
    // Previous and next faces of the list this face belongs to.
    links: [Option<usize>; 2],
    pass: usize,
}

impl Default for Face {
    fn default() -> Self {
        Face {
            normal: Vector::zeros(),
            dist: 0.0,
            pts: [0; 3],
            adj: [NO_FACE; 3],
            adj_edge: [0; 3],
            links: [None; 2],
            pass: 0,
        }
    }
}

/// An intrusive doubly-linked list of faces threaded through the face arena.
#[derive(Copy, Clone, Debug, Default)]
struct FaceList {
    root: Option<usize>,
    count: usize,
}

impl FaceList {
    fn append(&mut self, faces: &mut [Face], face: usize) {
        faces[face].links = [None, self.root];

        if let Some(root) = self.root {
            faces[root].links[0] = Some(face);
        }

        self.root = Some(face);
        self.count += 1;
    }

    fn remove(&mut self, faces: &mut [Face], face: usize) {
        let [prev, next] = faces[face].links;

        if let Some(next) = next {
            faces[next].links[0] = prev;
        }

        if let Some(prev) = prev {
            faces[prev].links[1] = next;
        }

        if self.root == Some(face) {
            self.root = next;
        }

        faces[face].links = [None; 2];
        self.count -= 1;
    }

    fn pop(&mut self, faces: &mut [Face]) -> Option<usize> {
        let face = self.root?;
        self.remove(faces, face);
        Some(face)
    }

    fn iter<'a>(&self, faces: &'a [Face]) -> impl Iterator<Item = usize> + 'a {
        core::iter::successors(self.root, move |id| faces[*id].links[1])
    }
}

/// The open boundary left on the hull while faces visible from a new vertex are removed.
///
/// The hull itself is only modified by [`Horizon::commit`]: until then, the visible faces
/// stay in the hull and the faces of the hull do not point to the new faces.
#[derive(Clone, Debug, Default)]
struct Horizon {
    // The last face created, and the first one.
    cf: Option<usize>,
    ff: Option<usize>,
    nf: usize,
    // `(f, e, nf)`: the edge `e` of the hull face `f` is shared with the new face `nf`.
    binds: ArrayVec<(usize, usize, usize), EPA_MAX_FACES>,
    visible: ArrayVec<usize, EPA_MAX_FACES>,
}

impl Horizon {
    /// Replaces the visible faces by the new faces.
    fn commit(&self, faces: &mut [Face], hull: &mut FaceList, stock: &mut FaceList) {
        for &(f, e, nf) in &self.binds {
            faces[f].adj[e] = nf;
            faces[f].adj_edge[e] = 0;
        }

        for &f in &self.visible {
            hull.remove(faces, f);
            stock.append(faces, f);
        }
    }

    /// Discards the new faces, leaving the hull as it was before the expansion.
    fn rollback(&self, faces: &mut [Face], hull: &mut FaceList, stock: &mut FaceList) {
        for &(_, _, nf) in &self.binds {
            hull.remove(faces, nf);
            stock.append(faces, nf);
        }
    }
}

fn bind(faces: &mut [Face], fa: usize, ea: usize, fb: usize, eb: usize) {
    faces[fa].adj_edge[ea] = eb;
    faces[fa].adj[ea] = fb;
    faces[fb].adj_edge[eb] = ea;
    faces[fb].adj[eb] = fa;
}

/// The Expanding Polytope Algorithm in 3D.
///
/// Starting from a tetrahedron enclosing the origin, built from the terminal simplex of
/// [`GJK`], EPA repeatedly picks the face of the polytope closest to the origin and pushes
/// the polytope toward the boundary of the Minkowski difference along that face normal.
/// When no support point lies farther than the tolerance, that face is the part of the
/// boundary closest to the origin: its distance is the penetration depth and its normal
/// the direction of minimal separation.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "f32")] {
/// use narrowphase3d::math::{Isometry, Vector};
/// use narrowphase3d::query::epa::EPA;
/// use narrowphase3d::query::gjk::{GjkStatus, MinkowskiDiff, GJK};
/// use narrowphase3d::shape::Cuboid;
///
/// let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
/// let pos1 = Isometry::identity();
/// let pos2 = Isometry::translation(1.5, 0.0, 0.0);
/// let diff = MinkowskiDiff::new(&pos1, &cuboid, &pos2, &cuboid);
///
/// let mut gjk = GJK::new();
/// assert_eq!(gjk.evaluate(&diff, &-Vector::x()), GjkStatus::Inside);
///
/// let mut epa = EPA::new();
/// assert!(epa.evaluate(&mut gjk, &diff, &-Vector::x()).is_usable());
/// assert!((epa.depth() - 0.5).abs() < 1.0e-3);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct EPA {
    options: EpaOptions,
    faces: [Face; EPA_MAX_FACES],
    vertices: ArrayVec<SimplexVertex, EPA_MAX_VERTICES>,
    hull: FaceList,
    stock: FaceList,
    result: Simplex,
    normal: Vector<Real>,
    depth: Real,
    status: EpaStatus,
}

impl Default for EPA {
    fn default() -> Self {
        Self::new()
    }
}

impl EPA {
    /// Creates an EPA instance using the default options.
    pub fn new() -> Self {
        Self::with_options(EpaOptions::default())
    }

    /// Creates an EPA instance using the given options.
    pub fn with_options(options: EpaOptions) -> Self {
        let mut epa = EPA {
            options,
            faces: [Face::default(); EPA_MAX_FACES],
            vertices: ArrayVec::new(),
            hull: FaceList::default(),
            stock: FaceList::default(),
            result: Simplex::default(),
            normal: Vector::zeros(),
            depth: 0.0,
            status: EpaStatus::Failed,
        };
        epa.reset();
        epa
    }

    /// Empties the polytope and clears the result of the last run.
    pub fn reset(&mut self) {
        self.hull = FaceList::default();
        self.stock = FaceList::default();
        self.vertices.clear();
        self.result = Simplex::default();
        self.normal = Vector::zeros();
        self.depth = 0.0;
        self.status = EpaStatus::Failed;

        for i in (0..EPA_MAX_FACES).rev() {
            self.faces[i] = Face::default();
            self.stock.append(&mut self.faces, i);
        }
    }

    /// The options this instance runs with.
    #[inline]
    pub fn options(&self) -> &EpaOptions {
        &self.options
    }

    /// The status of the last run.
    #[inline]
    pub fn status(&self) -> EpaStatus {
        self.status
    }

    /// The penetration depth found by the last run.
    #[inline]
    pub fn depth(&self) -> Real {
        self.depth
    }

    /// The outward normal of the polytope face closest to the origin.
    ///
    /// This is expressed in the frame of the Minkowski difference, i.e., the local-space
    /// of its first shape.
    #[inline]
    pub fn normal(&self) -> &Vector<Real> {
        &self.normal
    }

    /// The vertices of the closest face and the barycentric coordinates of the projection
    /// of the origin onto it.
    ///
    /// Vertex ids index [`EPA::vertex`].
    #[inline]
    pub fn result(&self) -> &Simplex {
        &self.result
    }

    /// The `i`-th vertex of the polytope.
    #[inline]
    pub fn vertex(&self, i: usize) -> &SimplexVertex {
        &self.vertices[i]
    }

    /// The number of vertices of the polytope.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// The vertices of the result with their barycentric weights.
    pub fn result_vertices(&self) -> impl Iterator<Item = (&SimplexVertex, Real)> + '_ {
        (0..self.result.rank())
            .map(move |i| (&self.vertices[self.result.vertex_id(i)], self.result.weight(i)))
    }

    /// The faces currently bounding the polytope.
    pub fn hull_faces(&self) -> impl Iterator<Item = HullFace> + '_ {
        self.hull.iter(&self.faces).map(move |id| {
            let face = &self.faces[id];
            HullFace {
                vertices: face.pts,
                normal: face.normal,
                distance: face.dist,
            }
        })
    }

    /// Checks that the hull is a closed 2-manifold.
    ///
    /// Every hull face must have three neighbors in the hull, each sharing the
    /// corresponding edge with the opposite orientation and pointing back to this face.
    pub fn hull_is_closed(&self) -> bool {
        let mut in_hull = [false; EPA_MAX_FACES];
        let mut count = 0;

        for id in self.hull.iter(&self.faces) {
            if in_hull[id] {
                return false;
            }
            in_hull[id] = true;
            count += 1;
        }

        if count != self.hull.count || count < 4 {
            return false;
        }

        for id in self.hull.iter(&self.faces) {
            let face = &self.faces[id];

            for i in 0..3 {
                let adj_id = face.adj[i];

                if adj_id == NO_FACE || !in_hull[adj_id] {
                    return false;
                }

                let adj = &self.faces[adj_id];
                let e = face.adj_edge[i];

                if e > 2
                    || adj.adj[e] != id
                    || adj.adj_edge[e] != i
                    || adj.pts[e] != face.pts[(i + 1) % 3]
                    || adj.pts[(e + 1) % 3] != face.pts[i]
                {
                    return false;
                }
            }
        }

        true
    }

    /// Computes the penetration depth of the shapes of `shape`, starting from the terminal
    /// simplex of `gjk`.
    ///
    /// `gjk` must have reported [`GjkStatus::Inside`](crate::query::gjk::GjkStatus::Inside);
    /// its simplex is grown into a tetrahedron if needed. If no tetrahedron can be built, the
    /// result falls back to a zero depth along `-guess` ([`EpaStatus::FallBack`]).
    pub fn evaluate<G1, G2>(
        &mut self,
        gjk: &mut GJK,
        shape: &MinkowskiDiff<G1, G2>,
        guess: &Vector<Real>,
    ) -> EpaStatus
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        self.reset();

        if gjk.simplex().rank() > 1 && gjk.enclose_origin(shape) {
            self.status = EpaStatus::Valid;
            let tetrahedron = core::array::from_fn(|i| *gjk.simplex_vertex(i));
            self.expand_from_tetrahedron(&tetrahedron, shape);

            if !self.status.is_usable() {
                log::debug!("EPA ended with the unusable status {:?}.", self.status);
            }

            return self.status;
        }

        self.fall_back(gjk, guess);
        self.status
    }

    fn fall_back(&mut self, gjk: &GJK, guess: &Vector<Real>) {
        self.status = EpaStatus::FallBack;
        self.normal = (-guess).try_normalize(0.0).unwrap_or_else(Vector::x);
        self.depth = 0.0;
        self.result = Simplex::default();

        if gjk.simplex().rank() > 0 {
            self.vertices.push(*gjk.simplex_vertex(0));
            self.result.push(0, 1.0);
        }
    }

    fn expand_from_tetrahedron<G1, G2>(
        &mut self,
        tetrahedron: &[SimplexVertex; 4],
        shape: &MinkowskiDiff<G1, G2>,
    ) where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        self.vertices.extend(tetrahedron.iter().copied());

        let mut c = [0, 1, 2, 3];
        let w = |i: usize| self.vertices[i].w;

        // Orient the tetrahedron so that face normals point outward.
        if det(&(w(0) - w(3)), &(w(1) - w(3)), &(w(2) - w(3))) < 0.0 {
            c.swap(0, 1);
        }

        let tetra = [
            self.new_face(c[0], c[1], c[2], true),
            self.new_face(c[1], c[0], c[3], true),
            self.new_face(c[2], c[1], c[3], true),
            self.new_face(c[0], c[2], c[3], true),
        ];

        let [Some(t0), Some(t1), Some(t2), Some(t3)] = tetra else {
            // `new_face` already set `Degenerated` or `OutOfFaces`.
            return;
        };

        if tetra
            .iter()
            .flatten()
            .any(|f| self.faces[*f].dist < -self.options.eps)
        {
            self.status = EpaStatus::NonConvex;
            return;
        }

        let Some(mut best) = self.find_best() else {
            self.status = EpaStatus::Failed;
            return;
        };
        let mut outer = self.faces[best];

        bind(&mut self.faces, t0, 0, t1, 0);
        bind(&mut self.faces, t0, 1, t2, 0);
        bind(&mut self.faces, t0, 2, t3, 0);
        bind(&mut self.faces, t1, 1, t3, 2);
        bind(&mut self.faces, t1, 2, t2, 1);
        bind(&mut self.faces, t2, 2, t3, 1);

        let mut pass = 0;

        for iteration in 0..self.options.max_iterations {
            if self.vertices.is_full() {
                self.status = EpaStatus::OutOfVertices;
                break;
            }

            log::trace!(
                "EPA iteration {}: {} faces, depth {}.",
                iteration,
                self.hull.count,
                outer.dist
            );

            let mut horizon = Horizon::default();
            pass += 1;
            self.faces[best].pass = pass;

            let dir = self.faces[best].normal;
            let w = self.vertices.len();
            self.vertices.push(SimplexVertex {
                d: dir,
                w: shape.support(&dir),
            });

            let wdist = dir.dot(&self.vertices[w].w) - self.faces[best].dist;

            if wdist <= self.options.eps {
                self.status = EpaStatus::AccuracyReached;
                break;
            }

            let mut valid = true;

            for j in 0..3 {
                if !valid {
                    break;
                }

                let (adj, adj_edge) = (self.faces[best].adj[j], self.faces[best].adj_edge[j]);
                valid &= self.expand(pass, w, adj, adj_edge, &mut horizon);
            }

            match (horizon.cf, horizon.ff) {
                (Some(cf), Some(ff)) if valid && horizon.nf >= 3 => {
                    bind(&mut self.faces, cf, 1, ff, 2);
                    horizon.commit(&mut self.faces, &mut self.hull, &mut self.stock);
                    self.hull.remove(&mut self.faces, best);
                    self.stock.append(&mut self.faces, best);

                    match self.find_best() {
                        Some(new_best) => {
                            best = new_best;
                            outer = self.faces[best];
                        }
                        None => {
                            self.status = EpaStatus::InvalidHull;
                            break;
                        }
                    }
                }
                _ => {
                    horizon.rollback(&mut self.faces, &mut self.hull, &mut self.stock);

                    // The hull is still the one `outer` belongs to.
                    self.status = match self.status {
                        EpaStatus::Degenerated | EpaStatus::NonConvex => {
                            EpaStatus::AccuracyReached
                        }
                        EpaStatus::Valid => EpaStatus::InvalidHull,
                        status => status,
                    };
                    break;
                }
            }
        }

        self.set_result(&outer);

        if self.status == EpaStatus::AccuracyReached && self.depth < self.options.eps {
            self.status = EpaStatus::Touching;
        }
    }

    fn set_result(&mut self, outer: &Face) {
        let projection = outer.normal * outer.dist;
        let c = outer.pts.map(|i| self.vertices[i].w - projection);
        let mut weights = [
            c[1].cross(&c[2]).norm(),
            c[2].cross(&c[0]).norm(),
            c[0].cross(&c[1]).norm(),
        ];
        let sum: Real = weights.iter().sum();

        if sum > 0.0 {
            weights.iter_mut().for_each(|w| *w /= sum);
        }

        self.result = Simplex::default();
        for i in 0..3 {
            self.result.push(outer.pts[i], weights[i]);
        }

        self.normal = outer.normal;
        self.depth = outer.dist;
    }

    fn new_face(&mut self, a: usize, b: usize, c: usize, forced: bool) -> Option<usize> {
        let Some(id) = self.stock.pop(&mut self.faces) else {
            self.status = EpaStatus::OutOfFaces;
            return None;
        };

        self.hull.append(&mut self.faces, id);

        let (wa, wb, wc) = (self.vertices[a].w, self.vertices[b].w, self.vertices[c].w);
        let normal = (wb - wa).cross(&(wc - wa));
        let l = normal.norm();

        if l > self.options.eps {
            let normal = normal / l;
            let dist = edge_dist(&normal, &wa, &wb)
                .or_else(|| edge_dist(&normal, &wb, &wc))
                .or_else(|| edge_dist(&normal, &wc, &wa))
                .unwrap_or_else(|| wa.dot(&normal));

            let face = &mut self.faces[id];
            face.pts = [a, b, c];
            face.normal = normal;
            face.dist = dist;
            face.adj = [NO_FACE; 3];
            face.adj_edge = [0; 3];
            face.pass = 0;

            if forced || dist >= -self.options.plane_eps {
                return Some(id);
            }

            self.status = EpaStatus::NonConvex;
        } else {
            self.status = EpaStatus::Degenerated;
        }

        self.hull.remove(&mut self.faces, id);
        self.stock.append(&mut self.faces, id);
        None
    }

    /// The hull face closest to the origin.
    fn find_best(&self) -> Option<usize> {
        self.hull.iter(&self.faces).min_by(|a, b| {
            let da = self.faces[*a].dist * self.faces[*a].dist;
            let db = self.faces[*b].dist * self.faces[*b].dist;
            da.total_cmp(&db)
        })
    }

    /// Collects the faces visible from the vertex `w`, walking from the face `f` entered
    /// through its edge `e`, and creates the faces joining the horizon to `w`.
    fn expand(
        &mut self,
        pass: usize,
        w: usize,
        f: usize,
        e: usize,
        horizon: &mut Horizon,
    ) -> bool {
        if f == NO_FACE {
            return false;
        }

        if self.faces[f].pass == pass {
            // Already reached through another edge: that edge is not on the horizon.
            return true;
        }

        let e1 = (e + 1) % 3;
        let face = self.faces[f];

        // `face.dist` may be an edge distance: test against the face plane itself.
        let plane_offset = face.normal.dot(&self.vertices[face.pts[0]].w);

        if face.normal.dot(&self.vertices[w].w) - plane_offset < -self.options.plane_eps {
            // `f` is not visible from `w`: its edge `e` is on the horizon.
            let Some(nf) = self.new_face(face.pts[e1], face.pts[e], w, false) else {
                return false;
            };

            self.faces[nf].adj[0] = f;
            self.faces[nf].adj_edge[0] = e;
            horizon.binds.push((f, e, nf));

            match horizon.cf {
                Some(cf) => bind(&mut self.faces, cf, 1, nf, 2),
                None => horizon.ff = Some(nf),
            }

            horizon.cf = Some(nf);
            horizon.nf += 1;
            return true;
        }

        let e2 = (e + 2) % 3;
        self.faces[f].pass = pass;

        if self.expand(pass, w, face.adj[e1], face.adj_edge[e1], horizon)
            && self.expand(pass, w, face.adj[e2], face.adj_edge[e2], horizon)
        {
            horizon.visible.push(f);
            return true;
        }

        false
    }
}

/// The distance between the origin and the edge `[a, b]` of a face with normal `normal`,
/// if the origin projects outside of the face through that edge.
fn edge_dist(normal: &Vector<Real>, a: &Vector<Real>, b: &Vector<Real>) -> Option<Real> {
    let ba = b - a;
    let n_ab = ba.cross(normal);

    if a.dot(&n_ab) >= 0.0 {
        return None;
    }

    let a_dot_ba = a.dot(&ba);
    let b_dot_ba = b.dot(&ba);

    let dist = if a_dot_ba > 0.0 {
        a.norm()
    } else if b_dot_ba < 0.0 {
        b.norm()
    } else {
        let a_dot_b = a.dot(b);
        let sqdist = (a.norm_squared() * b.norm_squared() - a_dot_b * a_dot_b) / ba.norm_squared();
        sqdist.max(0.0).sqrt()
    };

    Some(dist)
}
