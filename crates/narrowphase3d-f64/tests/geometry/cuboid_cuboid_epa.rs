use approx::assert_relative_eq;
use narrowphase3d_f64::math::{Isometry, Point, Vector};
use narrowphase3d_f64::query;
use narrowphase3d_f64::shape::Cuboid;
use std::f64::consts::FRAC_PI_4;

#[test]
#[allow(non_snake_case)]
fn cuboid_cuboid_EPA() {
    let c = Cuboid::new(Vector::new(2.0, 1.0, 1.0));
    let m1 = Isometry::translation(3.5, 0.0, 0.0);
    let m2 = Isometry::identity();

    let res = query::shape_intersect(&m1, &c, &m2, &c).expect("Penetration not found.");
    assert_relative_eq!(res.depth, 0.5, epsilon = 1.0e-9);
    assert_relative_eq!(*res.normal, Vector::x(), epsilon = 1.0e-9);
    assert_relative_eq!(res.contact_point, Point::new(1.75, 0.0, 0.0), epsilon = 1.0e-9);

    let m1 = Isometry::translation(0.0, 0.2, 0.0);
    let res = query::shape_intersect(&m1, &c, &m2, &c).expect("Penetration not found.");
    assert_relative_eq!(res.depth, 1.8, epsilon = 1.0e-9);
    assert_relative_eq!(*res.normal, Vector::y(), epsilon = 1.0e-9);
}

#[test]
fn rotated_cuboid_penetration() {
    let c = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let m1 = Isometry::identity();
    let m2 = Isometry::new(Vector::new(2.2, 0.0, 0.0), Vector::z() * FRAC_PI_4);

    // The edge of the rotated cuboid sinks into the face `x = 1` of the other one.
    let res = query::shape_intersect(&m1, &c, &m2, &c).expect("Penetration not found.");
    assert_relative_eq!(res.depth, 2.0f64.sqrt() - 1.2, epsilon = 1.0e-6);
    assert_relative_eq!(*res.normal, -Vector::x(), epsilon = 1.0e-6);
    assert_relative_eq!(res.contact_point.x, 1.0 - res.depth / 2.0, epsilon = 1.0e-6);
}

#[test]
fn rotated_cuboid_distance() {
    let c = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
    let m1 = Isometry::identity();
    let m2 = Isometry::new(Vector::new(3.0, 0.0, 0.0), Vector::z() * FRAC_PI_4);

    let res = query::details::distance_support_map_support_map(&m1, &c, &m2, &c).unwrap();
    assert_relative_eq!(res.distance, 2.0 - 2.0f64.sqrt(), epsilon = 1.0e-6);
    assert_relative_eq!(res.point1.x, 1.0, epsilon = 1.0e-6);
    assert_relative_eq!(res.point2.x, 3.0 - 2.0f64.sqrt(), epsilon = 1.0e-6);
    assert_relative_eq!(res.point2.y, 0.0, epsilon = 1.0e-6);
}
