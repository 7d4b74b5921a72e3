mod common;

use common::{polygon_record, row_with, square};
use terrashp_algo::contour::{build_contours, DEFAULT_ELEVATION_FIELD};
use terrashp_core::geom::{Polyline3, Vec3};
use terrashp_core::model::{AttrValue, Geometry, ShapeRecord};
use terrashp_core::Error;

#[test]
fn every_vertex_takes_the_elevation_exactly() {
    let elevation = 123.456_789;
    let records = vec![polygon_record(
        square(0.0, 0.0, 10.0, 0.0),
        row_with(1, AttrValue::Number(elevation), 3),
    )];

    let contours = build_contours(&records, DEFAULT_ELEVATION_FIELD).unwrap();
    assert_eq!(1, contours.len());
    assert!(contours[0].points.iter().all(|p| p.z == elevation));
}

#[test]
fn contours_are_closed_in_original_order() {
    let records = vec![ShapeRecord {
        geometry: Geometry::PolylineSet(vec![Polyline3::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(5.0, 5.0, 0.0),
        ])]),
        attributes: row_with(1, AttrValue::Number(20.0), 2),
    }];

    let contour = &build_contours(&records, 1).unwrap()[0];
    assert!(contour.is_closed());
    assert_eq!(4, contour.len());
    assert_eq!(Vec3::new(5.0, 0.0, 20.0), contour.points[1]);
    assert_eq!(Vec3::new(0.0, 0.0, 20.0), contour.points[3]);
}

#[test]
fn only_the_first_part_is_used() {
    let records = vec![ShapeRecord {
        geometry: Geometry::PolylineSet(vec![
            Polyline3::new(square(0.0, 0.0, 1.0, 0.0)),
            Polyline3::new(square(50.0, 50.0, 1.0, 0.0)),
        ]),
        attributes: row_with(1, AttrValue::Number(3.0), 2),
    }];

    let contours = build_contours(&records, 1).unwrap();
    assert_eq!(1, contours.len());
    assert!(contours[0].points.iter().all(|p| p.x <= 1.0));
}

#[test]
fn short_parts_give_degenerate_curves() {
    let records = vec![
        ShapeRecord {
            geometry: Geometry::PolylineSet(vec![Polyline3::new(vec![Vec3::new(1.0, 1.0, 0.0)])]),
            attributes: row_with(1, AttrValue::Number(3.0), 2),
        },
        ShapeRecord {
            geometry: Geometry::PolylineSet(Vec::new()),
            attributes: row_with(1, AttrValue::Number(3.0), 2),
        },
    ];

    let contours = build_contours(&records, 1).unwrap();
    assert_eq!(2, contours.len());
    assert_eq!(1, contours[0].len());
    assert!(contours[1].is_empty());
    assert_eq!(0.0, contours[0].length());
}

#[test]
fn numeric_text_elevations_are_accepted() {
    let records = vec![polygon_record(
        square(0.0, 0.0, 1.0, 0.0),
        row_with(1, AttrValue::Text(" 42.5 ".to_string()), 2),
    )];
    let contours = build_contours(&records, 1).unwrap();
    assert_eq!(42.5, contours[0].points[0].z);
}

#[test]
fn bad_elevation_attributes_are_errors() {
    let missing = vec![polygon_record(square(0.0, 0.0, 1.0, 0.0), vec![AttrValue::Number(1.0)])];
    assert_eq!(
        Error::MissingAttribute { record: 0, index: 1 },
        build_contours(&missing, 1).unwrap_err()
    );

    let text = vec![polygon_record(
        square(0.0, 0.0, 1.0, 0.0),
        row_with(1, AttrValue::Text("high".to_string()), 2),
    )];
    assert!(matches!(
        build_contours(&text, 1).unwrap_err(),
        Error::NonNumericAttribute { record: 0, index: 1, .. }
    ));
}
