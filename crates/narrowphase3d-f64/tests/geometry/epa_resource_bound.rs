use narrowphase3d_f64::math::{Isometry, Point, Vector};
use narrowphase3d_f64::query::epa::{EpaStatus, EPA, EPA_MAX_FACES, EPA_MAX_VERTICES};
use narrowphase3d_f64::query::gjk::{GjkStatus, MinkowskiDiff, GJK};
use narrowphase3d_f64::shape::{Ball, Capsule, Cone, ConvexPolyhedron, Cylinder, SupportMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn tetrahedron() -> ConvexPolyhedron {
    ConvexPolyhedron::from_points(vec![
        Point::new(1.0, 1.0, 1.0),
        Point::new(1.0, -1.0, -1.0),
        Point::new(-1.0, 1.0, -1.0),
        Point::new(-1.0, -1.0, 1.0),
    ])
    .unwrap()
}

fn random_pose(rng: &mut StdRng) -> Isometry<f64> {
    let translation = Vector::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );
    let axisangle = Vector::new(
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
    );
    Isometry::new(translation, axisangle)
}

#[test]
fn overlapping_tetrahedra_fit_in_the_arena() {
    let tetra = tetrahedron();
    let mut rng = StdRng::seed_from_u64(42);
    let mut num_overlaps = 0;

    for _ in 0..300 {
        let pos1 = random_pose(&mut rng);
        let pos2 = random_pose(&mut rng);
        let diff = MinkowskiDiff::new(&pos1, &tetra, &pos2, &tetra);

        let mut gjk = GJK::new();
        if gjk.evaluate(&diff, &-Vector::x()) != GjkStatus::Inside {
            continue;
        }

        num_overlaps += 1;
        let mut epa = EPA::new();
        let status = epa.evaluate(&mut gjk, &diff, &-Vector::x());

        assert!(status.is_usable(), "unexpected status {status:?}");
        assert_ne!(status, EpaStatus::OutOfFaces);
        assert_ne!(status, EpaStatus::OutOfVertices);
        assert!(epa.num_vertices() < EPA_MAX_VERTICES);
        assert!(epa.hull_faces().count() < EPA_MAX_FACES);
        assert!(epa.depth() >= 0.0);
    }

    assert!(num_overlaps > 0);
}

#[test]
fn overlapping_curved_shapes_end_with_a_closed_hull() {
    let shapes: Vec<Box<dyn SupportMap>> = vec![
        Box::new(Ball::new(0.8)),
        Box::new(Capsule::new_y(0.5, 0.4)),
        Box::new(Cylinder::new(0.5, 0.6)),
        Box::new(Cone::new(0.5, 0.6)),
    ];
    let mut rng = StdRng::seed_from_u64(7);
    let mut num_overlaps = 0;

    for _ in 0..500 {
        let i1 = rng.gen_range(0..shapes.len());
        let i2 = rng.gen_range(0..shapes.len());
        let pos1 = random_pose(&mut rng);
        let pos2 = random_pose(&mut rng);
        let diff = MinkowskiDiff::new(&pos1, &*shapes[i1], &pos2, &*shapes[i2]);

        let mut gjk = GJK::new();
        if gjk.evaluate(&diff, &-Vector::x()) != GjkStatus::Inside {
            continue;
        }

        num_overlaps += 1;
        let mut epa = EPA::new();
        let status = epa.evaluate(&mut gjk, &diff, &-Vector::x());

        // Curved shapes may exhaust either arena. The closest face found so far is kept.
        assert!(status.is_usable(), "unexpected status {status:?}");
        assert!(epa.hull_is_closed());

        if i1 == 0 && i2 == 0 {
            let exact_depth = 1.6 - (pos2.translation.vector - pos1.translation.vector).norm();
            assert!(epa.depth() <= exact_depth + 1.0e-9);
        }
    }

    assert!(num_overlaps > 0);
}

#[test]
fn hull_faces_enclose_the_origin() {
    let tetra = tetrahedron();
    let pos1 = Isometry::identity();
    let pos2 = Isometry::new(Vector::new(0.5, 0.2, -0.1), Vector::new(0.3, 1.0, 0.0));
    let diff = MinkowskiDiff::new(&pos1, &tetra, &pos2, &tetra);

    let mut gjk = GJK::new();
    assert_eq!(gjk.evaluate(&diff, &-Vector::x()), GjkStatus::Inside);

    let mut epa = EPA::new();
    assert!(epa.evaluate(&mut gjk, &diff, &-Vector::x()).is_usable());
    assert!(epa.hull_is_closed());

    for face in epa.hull_faces() {
        assert!(face.distance >= -1.0e-9);
        assert!(face.distance >= epa.depth() - 1.0e-9);
        assert!(face.vertices.iter().all(|i| *i < epa.num_vertices()));
    }
}
