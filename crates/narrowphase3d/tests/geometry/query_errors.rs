use narrowphase3d::math::{Isometry, Vector};
use narrowphase3d::query::details::{
    distance_support_map_support_map, intersect_support_map_support_map,
    intersect_support_map_support_map_with_params,
};
use narrowphase3d::query::epa::{EpaOptions, EpaStatus};
use narrowphase3d::query::{NarrowPhaseError, NarrowPhaseOptions};
use narrowphase3d::shape::{Ball, Cuboid};

#[test]
fn overlapping_shapes_have_no_distance() {
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(1.5, 0.0, 0.0);

    assert_eq!(
        distance_support_map_support_map(&pos1, &cuboid, &pos2, &cuboid),
        Err(NarrowPhaseError::Overlapping)
    );
}

#[test]
fn separated_shapes_have_no_penetration() {
    let ball = Ball::new(1.0);
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(3.0, 0.0, 0.0);

    assert_eq!(
        intersect_support_map_support_map(&pos1, &ball, &pos2, &ball),
        Ok(None)
    );
}

#[test]
fn unconverged_epa_is_reported() {
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(1.5, 0.0, 0.0);
    let options = NarrowPhaseOptions {
        epa: EpaOptions {
            max_iterations: 0,
            ..EpaOptions::default()
        },
        ..NarrowPhaseOptions::default()
    };

    let res = intersect_support_map_support_map_with_params(
        &pos1,
        &cuboid,
        &pos2,
        &cuboid,
        &Vector::x(),
        &options,
    );
    assert_eq!(res, Err(NarrowPhaseError::Epa(EpaStatus::Valid)));
}
