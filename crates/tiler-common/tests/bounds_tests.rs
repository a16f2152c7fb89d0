//! Tests for Bounds parsing and plain geometric operations.

use tiler_common::bounds::{Bounds, BoundsParseError};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bounds_new() {
    let bounds = Bounds::new([-90.0, -180.0], [90.0, 180.0]);
    assert_eq!(bounds.lower(), [-90.0, -180.0]);
    assert_eq!(bounds.upper(), [90.0, 180.0]);
}

#[test]
fn test_bounds_copy() {
    let bounds1 = Bounds::new([0.0, 0.0], [10.0, 10.0]);
    let bounds2 = bounds1;
    assert_eq!(bounds1, bounds2);
}

// ============================================================================
// Parsing tests
// ============================================================================

#[test]
fn test_parse_bounds_integer() {
    let bounds: Bounds = "0,0,100,100".parse().unwrap();
    assert_eq!(bounds.lower(), [0.0, 0.0]);
    assert_eq!(bounds.upper(), [100.0, 100.0]);
}

#[test]
fn test_parse_bounds_floating() {
    let bounds = Bounds::from_corner_string("55.5,37.25,56.125,38.75").unwrap();
    assert!((bounds.lower()[0] - 55.5).abs() < 0.001);
    assert!((bounds.upper()[1] - 38.75).abs() < 0.001);
}

#[test]
fn test_parse_bounds_scientific_notation() {
    let bounds = Bounds::from_corner_string("1e-6,2e-6,1e6,2e6").unwrap();
    assert!((bounds.lower()[0] - 1e-6).abs() < 1e-10);
    assert!((bounds.upper()[0] - 1e6).abs() < 0.001);
}

#[test]
fn test_parse_bounds_with_spaces() {
    let bounds = Bounds::from_corner_string(" -10, 170, 10 , -170 ").unwrap();
    assert_eq!(bounds.lower(), [-10.0, 170.0]);
    assert_eq!(bounds.upper(), [10.0, -170.0]);
}

#[test]
fn test_parse_bounds_too_few() {
    let result = Bounds::from_corner_string("0,0,100");
    assert!(matches!(result, Err(BoundsParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_bounds_too_many() {
    let result = Bounds::from_corner_string("0,0,100,100,200");
    assert!(matches!(result, Err(BoundsParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_bounds_invalid_number() {
    let result = Bounds::from_corner_string("abc,0,100,100");
    assert!(matches!(result, Err(BoundsParseError::InvalidNumber(_))));
}

#[test]
fn test_parse_bounds_empty_string() {
    let result = Bounds::from_corner_string("");
    assert!(matches!(result, Err(BoundsParseError::InvalidFormat(_))));
}

// ============================================================================
// Geometry tests
// ============================================================================

#[test]
fn test_bounds_span() {
    let bounds = Bounds::new([10.0, 5.0], [30.0, 25.0]);
    assert_eq!(bounds.span(0), 20.0);
    assert_eq!(bounds.span(1), 20.0);
}

#[test]
fn test_bounds_span_reversed_is_negative() {
    // Corners are kept as given so wrapped intervals survive.
    let bounds = Bounds::new([10.0, 10.0], [0.0, 0.0]);
    assert_eq!(bounds.span(0), -10.0);
}

#[test]
fn test_bounds_center() {
    let bounds = Bounds::new([-10.0, 0.0], [10.0, 20.0]);
    assert_eq!(bounds.center(), [0.0, 10.0]);
}

#[test]
fn test_contains_point_edges_included() {
    let bounds = Bounds::new([0.0, 0.0], [10.0, 10.0]);
    assert!(bounds.contains_point([0.0, 5.0]));
    assert!(bounds.contains_point([10.0, 10.0]));
    assert!(!bounds.contains_point([-1.0, 5.0]));
    assert!(!bounds.contains_point([5.0, 11.0]));
}

#[test]
fn test_contains_point_any_orientation() {
    // Pixel bounds with y growing downward are often written bottom-left first.
    let bounds = Bounds::new([10496.0, 6400.0], [10752.0, 6144.0]);
    assert!(bounds.contains_point([10600.0, 6200.0]));
    assert!(!bounds.contains_point([10600.0, 6500.0]));
}

#[test]
fn test_is_finite() {
    assert!(Bounds::new([0.0, 0.0], [1.0, 1.0]).is_finite());
    assert!(!Bounds::new([f64::NAN, 0.0], [1.0, 1.0]).is_finite());
    assert!(!Bounds::new([0.0, 0.0], [f64::INFINITY, 1.0]).is_finite());
}

// ============================================================================
// Serde tests
// ============================================================================

#[test]
fn test_bounds_serialize_as_nested_array() {
    let bounds = Bounds::new([55.0, 37.0], [56.0, 38.0]);
    let json = serde_json::to_string(&bounds).unwrap();
    assert_eq!(json, "[[55.0,37.0],[56.0,38.0]]");

    let back: Bounds = serde_json::from_str(&json).unwrap();
    assert_eq!(back, bounds);
}
