mod common;

use approx::assert_relative_eq;
use common::square;
use terrashp_algo::sampler::{division_lengths, sample};
use terrashp_core::geom::{Polyline3, Vec3};
use terrashp_core::Error;

#[test]
fn closed_curve_shorter_than_resolution_gives_nothing() {
    let curve = Polyline3::closed(square(0.0, 0.0, 1.0, 0.0));
    assert!(sample(&[curve], 4.5).unwrap().is_empty());
}

#[test]
fn closed_perimeter_multiple_of_resolution_gives_exact_count() {
    // perimeter 40
    let curve = Polyline3::closed(square(0.0, 0.0, 10.0, 7.0));
    assert_eq!(10, sample(&[curve.clone()], 4.0).unwrap().len());
    assert_eq!(4, sample(&[curve.clone()], 10.0).unwrap().len());
    assert_eq!(1, sample(&[curve], 40.0).unwrap().len());
}

#[test]
fn open_curves_include_both_ends() {
    let curve = Polyline3::new(vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)]);
    let points = sample(&[curve], 4.0).unwrap();
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    assert_eq!(vec![0.0, 4.0, 8.0, 10.0], xs);
}

#[test]
fn points_follow_curve_order_and_keep_elevation() {
    let low = Polyline3::closed(square(0.0, 0.0, 10.0, 5.0));
    let high = Polyline3::closed(square(2.0, 2.0, 6.0, 15.0));
    let points = sample(&[low, high], 2.0).unwrap();

    assert_eq!(20 + 12, points.len());
    assert!(points[..20].iter().all(|p| p.z == 5.0));
    assert!(points[20..].iter().all(|p| p.z == 15.0));
    assert_eq!(Vec3::new(0.0, 0.0, 5.0), points[0]);
    assert_relative_eq!(2.0, points[1].x);
    assert_eq!(Vec3::new(2.0, 2.0, 15.0), points[20]);
}

#[test]
fn coincident_points_are_not_deduplicated() {
    let a = Polyline3::closed(square(0.0, 0.0, 4.0, 1.0));
    let points = sample(&[a.clone(), a], 4.0).unwrap();
    assert_eq!(8, points.len());
    assert_eq!(points[0], points[4]);
}

#[test]
fn degenerate_curves_contribute_nothing() {
    let single = Polyline3::new(vec![Vec3::new(1.0, 1.0, 1.0)]);
    assert!(sample(&[single, Polyline3::default()], 1.0).unwrap().is_empty());
}

#[test]
fn division_lengths_drop_repeated_start_on_closed_curves() {
    assert_eq!(vec![0.0, 3.0, 6.0, 9.0], division_lengths(10.0, 3.0, true));
    assert_eq!(vec![0.0, 3.0, 6.0, 9.0, 10.0], division_lengths(10.0, 3.0, false));
    assert!(division_lengths(2.9, 3.0, false).is_empty());
}

#[test]
fn perimeter_rounded_below_resolution_still_gives_one_point() {
    let just_short = f64::from_bits(3.0f64.to_bits() - 1);
    assert_eq!(vec![0.0], division_lengths(just_short, 3.0, true));
    assert_eq!(vec![0.0, just_short], division_lengths(just_short, 3.0, false));
}

#[test]
fn rejects_non_positive_resolution() {
    let curve = Polyline3::closed(square(0.0, 0.0, 10.0, 0.0));
    assert_eq!(Error::InvalidResolution(0.0), sample(&[curve.clone()], 0.0).unwrap_err());
    assert!(sample(&[curve], f64::NAN).is_err());
}
