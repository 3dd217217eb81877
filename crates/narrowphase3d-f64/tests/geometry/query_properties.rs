use approx::assert_relative_eq;
use narrowphase3d_f64::math::{Isometry, Vector};
use narrowphase3d_f64::query;
use narrowphase3d_f64::shape::{Ball, Capsule, Cuboid, Cylinder, SupportMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_pose(rng: &mut StdRng) -> Isometry<f64> {
    let translation = Vector::new(
        rng.gen_range(-1.5..1.5),
        rng.gen_range(-1.5..1.5),
        rng.gen_range(-1.5..1.5),
    );
    let axisangle = Vector::new(
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
    );
    Isometry::new(translation, axisangle)
}

fn shapes() -> Vec<Box<dyn SupportMap>> {
    vec![
        Box::new(Ball::new(0.8)),
        Box::new(Cuboid::new(Vector::new(1.0, 0.5, 0.75))),
        Box::new(Capsule::new_y(0.5, 0.4)),
        Box::new(Cylinder::new(0.6, 0.5)),
    ]
}

#[test]
fn queries_are_idempotent() {
    let shapes = shapes();
    let mut rng = StdRng::seed_from_u64(0);

    for _ in 0..100 {
        let g1 = &*shapes[rng.gen_range(0..shapes.len())];
        let g2 = &*shapes[rng.gen_range(0..shapes.len())];
        let pos1 = random_pose(&mut rng);
        let pos2 = random_pose(&mut rng);

        assert_eq!(
            query::shape_distance(&pos1, g1, &pos2, g2),
            query::shape_distance(&pos1, g1, &pos2, g2)
        );
        assert_eq!(
            query::shape_intersect(&pos1, g1, &pos2, g2),
            query::shape_intersect(&pos1, g1, &pos2, g2)
        );
    }
}

#[test]
fn distance_is_symmetric() {
    let shapes = shapes();
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..200 {
        let g1 = &*shapes[rng.gen_range(0..shapes.len())];
        let g2 = &*shapes[rng.gen_range(0..shapes.len())];
        let pos1 = random_pose(&mut rng);
        let pos2 = random_pose(&mut rng);

        let d12 = query::shape_distance(&pos1, g1, &pos2, g2);
        let d21 = query::shape_distance(&pos2, g2, &pos1, g1);

        match (d12, d21) {
            (Some(d12), Some(d21)) => assert_relative_eq!(d12, d21, epsilon = 1.0e-3),
            (None, None) => {}
            // Only a near-tangent pair may be classified differently.
            (Some(d), None) | (None, Some(d)) => assert!(d < 1.0e-3),
        }
    }
}

#[test]
fn cuboid_penetration_is_symmetric() {
    let c1 = Cuboid::new(Vector::new(1.0, 0.5, 0.75));
    let c2 = Cuboid::new(Vector::new(0.4, 0.9, 0.6));
    let mut rng = StdRng::seed_from_u64(2);
    let mut num_hits = 0;

    for _ in 0..200 {
        let pos1 = random_pose(&mut rng);
        let pos2 = random_pose(&mut rng);

        let hit12 = query::shape_intersect(&pos1, &c1, &pos2, &c2);
        let hit21 = query::shape_intersect(&pos2, &c2, &pos1, &c1);

        if let (Some(hit12), Some(hit21)) = (hit12, hit21) {
            num_hits += 1;
            assert_relative_eq!(hit12.depth, hit21.depth, epsilon = 1.0e-6);
            assert_relative_eq!(*hit12.normal, -*hit21.normal, epsilon = 1.0e-6);
        } else {
            assert_eq!(hit12.is_some(), hit21.is_some());
        }
    }

    assert!(num_hits > 0);
}

#[test]
fn witness_points_are_on_the_shapes() {
    let ball = Ball::new(0.5);
    let cuboid = Cuboid::new(Vector::new(1.0, 0.5, 0.75));
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..100 {
        let pos1 = random_pose(&mut rng);
        let pos2 = random_pose(&mut rng);

        if let Ok(res) =
            query::details::distance_support_map_support_map(&pos1, &cuboid, &pos2, &ball)
        {
            assert_relative_eq!((res.point1 - res.point2).norm(), res.distance, epsilon = 1.0e-9);

            // The witness on the ball lies on its surface.
            let center = pos2.translation.vector;
            assert_relative_eq!((res.point2.coords - center).norm(), 0.5, epsilon = 1.0e-2);

            // The witness on the cuboid lies inside of it.
            let local = pos1.inverse_transform_point(&res.point1);
            assert!(local.x.abs() <= 1.0 + 1.0e-6);
            assert!(local.y.abs() <= 0.5 + 1.0e-6);
            assert!(local.z.abs() <= 0.75 + 1.0e-6);
        }
    }
}

#[test]
fn trait_objects_match_concrete_shapes() {
    let ball = Ball::new(0.5);
    let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let dyn_ball: &dyn SupportMap = &ball;
    let dyn_cuboid: &dyn SupportMap = &cuboid;
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(0.0, 1.25, 0.0);

    assert_eq!(
        query::shape_intersect(&pos1, dyn_cuboid, &pos2, dyn_ball),
        query::shape_intersect(&pos1, &cuboid, &pos2, &ball)
    );

    let pos2 = Isometry::translation(0.0, 3.0, 0.0);
    let dist = query::shape_distance(&pos1, dyn_cuboid, &pos2, dyn_ball).unwrap();
    assert_relative_eq!(dist, 1.5, epsilon = 1.0e-5);
}
