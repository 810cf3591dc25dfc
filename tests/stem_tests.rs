#![cfg(feature = "bsp")]

mod support;

use keycapgen::{
    BspEngine, KeycapError, StemFeatureBuilder, StemType,
    mesh::shapes::polygon_area,
    stem::StemDimensions,
};

use crate::support::{FailingBoolean, approx_eq, bounding_box};

#[test]
fn no_stem_builds_nothing() {
    // The failing engine proves no boolean is attempted
    let stem = StemFeatureBuilder::new()
        .build(StemType::None, 8.5, &FailingBoolean)
        .unwrap();
    assert!(stem.is_none());
}

#[test]
fn cherry_stem_has_a_cross_through_it() {
    let dims = StemDimensions::default();
    let stem = StemFeatureBuilder::new()
        .build(StemType::CherryMx, 8.5, &BspEngine::new())
        .unwrap()
        .unwrap();

    let height = dims.stem_height(8.5);
    assert_eq!(height, 8.0);
    let expected = height * (polygon_area(dims.outer_radius, dims.segments) - dims.cross_area());
    assert!(
        approx_eq(stem.volume(), expected, 1e-3),
        "volume {} != {expected}",
        stem.volume()
    );

    let [min_x, min_y, min_z, max_x, max_y, max_z] = bounding_box(&stem);
    assert!(approx_eq(min_z, 0.0, 1e-9));
    assert!(approx_eq(max_z, 8.0, 1e-9));
    assert!(approx_eq(max_x, 2.8, 1e-9));
    assert!(approx_eq(min_x, -2.8, 1e-9));
    assert!(approx_eq(max_y, 2.8, 1e-9));
    assert!(approx_eq(min_y, -2.8, 1e-9));

    // Arm tips of the cross show up on the cap
    let has_vertex = |x: f64, y: f64| {
        stem.vertices
            .iter()
            .any(|p| approx_eq(p.x, x, 1e-6) && approx_eq(p.y, y, 1e-6) && p.z.abs() < 1e-6)
    };
    assert!(has_vertex(0.645, 2.075));
    assert!(has_vertex(-2.075, -0.645));
}

#[test]
fn cross_arms_stay_inside_the_post() {
    let dims = StemDimensions::default();
    assert!(dims.cross_length / 2.0 < dims.outer_radius);
}

#[test]
fn oversized_cross_is_rejected() {
    let builder = StemFeatureBuilder::with_dimensions(StemDimensions {
        cross_length: 6.0,
        ..StemDimensions::default()
    });
    assert!(matches!(
        builder.build(StemType::CherryMx, 8.5, &BspEngine::new()),
        Err(KeycapError::DegenerateProfile { .. })
    ));
}

#[test]
fn stem_too_short_for_its_clearance() {
    assert!(matches!(
        StemFeatureBuilder::new().build(StemType::CherryMx, 0.4, &BspEngine::new()),
        Err(KeycapError::DegenerateProfile {
            what: "stem height",
            ..
        })
    ));
}

#[test]
fn boolean_failures_surface_unchanged() {
    let err = StemFeatureBuilder::new()
        .build(StemType::CherryMx, 8.5, &FailingBoolean)
        .unwrap_err();
    assert_eq!(err, KeycapError::boolean("subtract", "solver gave up"));
}
