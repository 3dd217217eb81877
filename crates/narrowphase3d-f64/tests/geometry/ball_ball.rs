use approx::assert_relative_eq;
use narrowphase3d_f64::math::{Isometry, Point, Vector};
use narrowphase3d_f64::query;
use narrowphase3d_f64::query::epa::{EpaStatus, EPA, EPA_MAX_VERTICES};
use narrowphase3d_f64::query::gjk::{GjkStatus, MinkowskiDiff, GJK, GJK_EPS};
use narrowphase3d_f64::shape::Ball;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn ball_ball_distance() {
    let ball1 = Ball::new(1.0);
    let ball2 = Ball::new(0.5);
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(0.0, 4.0, 0.0);

    let dist = query::shape_distance(&pos1, &ball1, &pos2, &ball2).unwrap();
    assert_relative_eq!(dist, 2.5, epsilon = 1.0e-5);

    let res = query::details::distance_support_map_support_map(&pos1, &ball1, &pos2, &ball2)
        .unwrap();
    assert_relative_eq!(res.distance, dist);
    assert_relative_eq!(res.point1, Point::new(0.0, 1.0, 0.0), epsilon = 1.0e-2);
    assert_relative_eq!(res.point2, Point::new(0.0, 3.5, 0.0), epsilon = 1.0e-2);
    assert_relative_eq!((res.point1 - res.point2).norm(), res.distance, epsilon = 1.0e-9);
}

#[test]
fn ball_ball_distance_error_is_relative() {
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..200 {
        let ball1 = Ball::new(rng.gen_range(0.2..2.0));
        let ball2 = Ball::new(rng.gen_range(0.2..2.0));
        let dir = Vector::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
        .normalize();
        let gap = rng.gen_range(0.01..50.0);
        let center2 = dir * (ball1.radius + ball2.radius + gap);
        let pos1 = Isometry::identity();
        let pos2 = Isometry::new(center2, Vector::new(0.1, 0.2, 0.3));

        // GJK converges from above, up to `GJK_EPS` relative to the distance.
        let dist = query::shape_distance(&pos1, &ball1, &pos2, &ball2).unwrap();
        assert!(dist >= gap - 1.0e-9, "{dist} < {gap}");
        assert!(dist - gap <= GJK_EPS * dist.max(1.0) + 1.0e-12, "{dist} vs. {gap}");
    }
}

#[test]
fn ball_ball_shallow_penetration() {
    let ball = Ball::new(1.0);
    let pos1 = Isometry::identity();

    for dir in [Vector::x(), Vector::y()] {
        let pos2 = Isometry::translation(dir.x * 1.9, dir.y * 1.9, 0.0);
        let hit = query::shape_intersect(&pos1, &ball, &pos2, &ball).unwrap();

        // Along `x`, the polytope runs out of vertices a few 1.0e-6 short of the sphere.
        assert_relative_eq!(hit.depth, 0.1, epsilon = 1.0e-5);
        assert!(hit.depth <= 0.1 + 1.0e-9);
        assert_relative_eq!(*hit.normal, -dir, epsilon = 1.0e-2);
        assert_relative_eq!(hit.contact_point, Point::from(dir * 0.95), epsilon = 1.0e-3);
    }
}

#[test]
fn ball_ball_penetration_off_axis() {
    let ball1 = Ball::new(1.0);
    let ball2 = Ball::new(0.75);
    let center2 = Vector::new(0.3, 1.2, -0.9);
    let pos1 = Isometry::identity();
    let pos2 = Isometry::new(center2, Vector::new(0.2, -0.4, 1.0));

    let hit = query::shape_intersect(&pos1, &ball1, &pos2, &ball2).unwrap();
    let expected_depth = 1.75 - center2.norm();
    assert_relative_eq!(hit.depth, expected_depth, epsilon = 1.0e-4);
    assert_relative_eq!(*hit.normal, -center2.normalize(), epsilon = 1.0e-2);
}

// A polytope of `EPA_MAX_VERTICES` vertices inscribed in a sphere of radius 1.75 cannot
// get closer than a few 1.0e-5 to it. Deeper overlaps leave more of the sphere to cover,
// so the reported depth is a lower bound that loosens with the penetration.
#[test]
fn ball_ball_deep_penetration() {
    let ball1 = Ball::new(1.0);
    let ball2 = Ball::new(0.75);
    let pos1 = Isometry::identity();
    let dirs = [
        Vector::x(),
        Vector::y(),
        Vector::new(0.3, 1.2, -0.9).normalize(),
    ];

    // The normal is only meaningful while the centers are far enough apart.
    let cases = [(0.5, 1.0e-3, Some(5.0e-2)), (0.25, 2.0e-2, None), (0.1, 5.0e-2, None)];

    for (dist, tolerance, normal_tolerance) in cases {
        for dir in dirs {
            let pos2 = Isometry::translation(dir.x * dist, dir.y * dist, dir.z * dist);
            let diff = MinkowskiDiff::new(&pos1, &ball1, &pos2, &ball2);
            let exact_depth = 1.75 - dist;

            let mut gjk = GJK::new();
            assert_eq!(gjk.evaluate(&diff, &-Vector::x()), GjkStatus::Inside);

            let mut epa = EPA::new();
            let status = epa.evaluate(&mut gjk, &diff, &-Vector::x());
            assert_eq!(status, EpaStatus::OutOfVertices);
            assert_eq!(epa.num_vertices(), EPA_MAX_VERTICES);
            assert!(epa.hull_is_closed());
            assert!(epa.depth() <= exact_depth + 1.0e-9);
            assert_relative_eq!(epa.depth(), exact_depth, epsilon = tolerance);

            let hit = query::shape_intersect(&pos1, &ball1, &pos2, &ball2).unwrap();
            assert_relative_eq!(hit.depth, epa.depth());
            if let Some(normal_tolerance) = normal_tolerance {
                assert_relative_eq!(*hit.normal, -dir, epsilon = normal_tolerance);
            }
        }
    }
}

#[test]
fn tangent_balls() {
    let ball = Ball::new(1.0);
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(2.0, 0.0, 0.0);

    // A tangency is either a zero distance or a zero-depth penetration.
    match query::shape_distance(&pos1, &ball, &pos2, &ball) {
        Some(dist) => assert!(dist.abs() < 1.0e-5),
        None => {
            let hit = query::shape_intersect(&pos1, &ball, &pos2, &ball).unwrap();
            assert!(hit.depth.abs() < 1.0e-5);
        }
    }
}
