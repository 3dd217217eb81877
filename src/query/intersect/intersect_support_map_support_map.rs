use na::Unit;

use crate::math::{Isometry, Point, Real, Vector};
use crate::query::epa::EPA;
use crate::query::gjk::{GjkStatus, MinkowskiDiff, GJK};
use crate::query::{NarrowPhaseError, NarrowPhaseOptions, ShapeIntersection};
use crate::shape::SupportMap;

/// Penetration between support-mapped shapes.
///
/// Returns `Ok(None)` if the shapes are separated.
pub fn intersect_support_map_support_map<G1, G2>(
    pos1: &Isometry<Real>,
    g1: &G1,
    pos2: &Isometry<Real>,
    g2: &G2,
) -> Result<Option<ShapeIntersection>, NarrowPhaseError>
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    intersect_support_map_support_map_with_params(
        pos1,
        g1,
        pos2,
        g2,
        &Vector::x(),
        &NarrowPhaseOptions::default(),
    )
}

/// Penetration between support-mapped shapes.
///
/// This allows a more fine grained control over the underlying GJK and EPA algorithms.
/// The first support point is searched along `guess`, expressed in the local-space of `g1`.
/// If EPA cannot build a polytope around the origin, the reported depth is zero and the
/// normal is `-guess` rotated into world-space.
pub fn intersect_support_map_support_map_with_params<G1, G2>(
    pos1: &Isometry<Real>,
    g1: &G1,
    pos2: &Isometry<Real>,
    g2: &G2,
    guess: &Vector<Real>,
    options: &NarrowPhaseOptions,
) -> Result<Option<ShapeIntersection>, NarrowPhaseError>
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let shape = MinkowskiDiff::new(pos1, g1, pos2, g2);
    let mut gjk = GJK::with_options(options.gjk);

    match gjk.evaluate(&shape, &-guess) {
        GjkStatus::Valid => Ok(None),
        GjkStatus::Failed => Err(NarrowPhaseError::GjkFailed),
        GjkStatus::Inside => {
            let mut epa = EPA::with_options(options.epa);
            let status = epa.evaluate(&mut gjk, &shape, &-guess);

            if !status.is_usable() {
                return Err(NarrowPhaseError::Epa(status));
            }

            let w0 = epa
                .result_vertices()
                .fold(Vector::zeros(), |w0, (vertex, weight)| {
                    w0 + shape.support0(&vertex.d) * weight
                });
            let normal = epa.normal();
            let depth = epa.depth();
            let contact_point = w0 - normal * (depth * 0.5);

            Ok(Some(ShapeIntersection {
                contact_point: pos1 * Point::from(contact_point),
                depth,
                normal: Unit::new_normalize(pos1 * -normal),
            }))
        }
    }
}
