mod common;

use approx::assert_relative_eq;
use common::FlatPlane;
use terrashp_algo::config::PipelineConfig;
use terrashp_algo::pipeline::Pipeline;
use terrashp_algo::reconstruct_site;
use terrashp_algo::surface::SurfaceBuilder;
use terrashp_core::geom::Vec3;
use terrashp_core::model::Category;
use terrashp_core::raw::{RawField, RawPoint, RawShape, RawShapefile, RawValue};
use terrashp_core::Error;

fn field(name: &str, field_type: char) -> RawField {
    RawField {
        name: name.as_bytes().to_vec(),
        field_type,
        length: 10,
        decimal_count: 0,
    }
}

fn ring(x: f64, y: f64, size: f64) -> RawShape {
    RawShape {
        points: vec![
            RawPoint::xy(x, y),
            RawPoint::xy(x, y + size),
            RawPoint::xy(x + size, y + size),
            RawPoint::xy(x + size, y),
            RawPoint::xy(x, y),
        ],
        parts: vec![0],
    }
}

fn text(s: &str) -> RawValue {
    RawValue::Bytes(s.as_bytes().to_vec())
}

fn contours(name: &str, rings: &[(f64, f64, f64, f64)]) -> RawShapefile {
    RawShapefile {
        name: name.to_string(),
        shape_type: 3,
        fields: vec![field("UFID", 'C'), field("HEIGHT", 'N')],
        shapes: rings.iter().map(|&(x, y, size, _)| ring(x, y, size)).collect(),
        records: rings
            .iter()
            .map(|&(_, _, _, z)| vec![text("c"), RawValue::Number(z)])
            .collect(),
    }
}

fn buildings(name: &str, footprints: &[(f64, f64, f64, f64)]) -> RawShapefile {
    RawShapefile {
        name: name.to_string(),
        shape_type: 5,
        fields: ["UFID", "NAME", "KIND", "USE", "AREA", "FLOORS"]
            .iter()
            .map(|n| field(n, 'C'))
            .collect(),
        shapes: footprints.iter().map(|&(x, y, size, _)| ring(x, y, size)).collect(),
        records: footprints
            .iter()
            .map(|&(_, _, _, stories)| {
                let mut row: Vec<RawValue> = (0..5).map(|_| text("-")).collect();
                row.push(RawValue::Number(stories));
                row
            })
            .collect(),
    }
}

fn roads(name: &str, count: usize) -> RawShapefile {
    RawShapefile {
        name: name.to_string(),
        shape_type: 3,
        fields: vec![field("UFID", 'C')],
        shapes: (0..count).map(|i| ring(i as f64, 0.0, 1.0)).collect(),
        records: (0..count).map(|_| vec![text("r")]).collect(),
    }
}

/// Serves the files whose name ends with one of the requested prefixes, in
/// prefix order.
fn serve(files: Vec<RawShapefile>) -> impl FnMut(&[String]) -> anyhow::Result<Vec<RawShapefile>> {
    move |prefixes: &[String]| {
        let mut out = Vec::new();
        for prefix in prefixes {
            out.extend(
                files
                    .iter()
                    .filter(|f| f.name.ends_with(prefix.as_str()))
                    .cloned(),
            );
        }
        Ok(out)
    }
}

fn site() -> Vec<RawShapefile> {
    vec![
        contours("a:N1L_F0010000", &[(0.0, 0.0, 40.0, 10.0)]),
        contours("b:N3L_F0010000", &[(10.0, 10.0, 20.0, 20.0)]),
        buildings(
            "a:N1A_B0010000",
            &[(18.0, 18.0, 4.0, 2.0), (500.0, 500.0, 4.0, 5.0)],
        ),
        roads("a:N3L_A0020000", 3),
    ]
}

#[test]
fn reconstructs_a_small_site() {
    let mut source = serve(site());
    let out = reconstruct_site(&mut source, PipelineConfig::default()).unwrap();

    assert_eq!(2, out.contours.len());
    assert!(out.contours[0].points.iter().all(|p| p.z == 10.0));
    assert!(out.contours[1].points.iter().all(|p| p.z == 20.0));
    assert_eq!(40 + 20, out.terrain_points.len());
    assert!(out.terrain.triangle_count() > 0);

    assert_eq!(1, out.buildings.len());
    let building = &out.buildings[0];
    assert_eq!(0, building.source_index);
    assert_relative_eq!(20.0, building.base_z, epsilon = 1e-6);
    assert_relative_eq!(7.0, building.height);

    assert_eq!(3, out.road_centerlines.len());
    assert!(out.road_regions.is_empty());
    assert!(out.rivers.is_empty());
    assert!(out.water.is_empty());

    let report = &out.report;
    assert_eq!(6, report.datasets.len());
    assert_eq!(2, report.datasets[0].sources);
    assert_eq!(vec!["UFID", "HEIGHT", "UFID", "HEIGHT"], report.datasets[0].field_names);
    assert_eq!(60, report.terrain.sample_points);
    assert_eq!(1, report.buildings.unprojectable);
    assert_eq!(3, report.road_centerlines);
    let codes: Vec<&str> = report.warnings.iter().map(|w| w.code.as_str()).collect();
    assert_eq!(vec!["unprojectable_buildings"], codes);
}

#[test]
fn contour_and_building_data_are_required() {
    let mut no_buildings = serve(vec![contours("a:N1L_F0010000", &[(0.0, 0.0, 40.0, 10.0)])]);
    let err = reconstruct_site(&mut no_buildings, PipelineConfig::default())
        .err()
        .unwrap();
    assert_eq!(
        Some(&Error::MissingDataset("building".to_string())),
        err.downcast_ref::<Error>()
    );

    let mut nothing = serve(Vec::new());
    let err = reconstruct_site(&mut nothing, PipelineConfig::default()).err().unwrap();
    assert_eq!(
        Some(&Error::MissingDataset("contour".to_string())),
        err.downcast_ref::<Error>()
    );
}

#[test]
fn unknown_encoding_is_rejected_before_loading() {
    let cfg = PipelineConfig {
        encoding: "not-an-encoding".to_string(),
        ..PipelineConfig::default()
    };
    let mut calls = 0;
    let mut source = |_: &[String]| -> anyhow::Result<Vec<RawShapefile>> {
        calls += 1;
        Ok(Vec::new())
    };
    let err = reconstruct_site(&mut source, cfg).err().unwrap();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnknownEncoding(_))));
    assert_eq!(0, calls);
}

struct FlatBuilder(f64);

impl SurfaceBuilder for FlatBuilder {
    type Surface = FlatPlane;

    fn build(&self, _points: &[Vec3]) -> terrashp_core::Result<FlatPlane> {
        Ok(FlatPlane::unbounded(self.0))
    }
}

#[test]
fn runs_with_any_surface_builder() {
    let cfg = PipelineConfig {
        resolution: 10.0,
        floor_height: 3.0,
        ..PipelineConfig::default()
    };
    let mut source = serve(site());
    let out = Pipeline::new(cfg).run(&mut source, &FlatBuilder(-4.0)).unwrap();

    assert_eq!(16 + 8, out.terrain_points.len());
    assert_eq!(2, out.buildings.len());
    assert_eq!(vec![-4.0, -4.0], out.buildings.iter().map(|b| b.base_z).collect::<Vec<_>>());
    assert_relative_eq!(15.0, out.buildings[1].height);
    assert!(out.report.warnings.is_empty());
}

#[test]
fn point_buildings_are_reported() {
    let mut files = site();
    files[2] = RawShapefile {
        name: "a:N1A_B0010000".to_string(),
        shape_type: 1,
        fields: vec![field("UFID", 'C')],
        shapes: vec![RawShape {
            points: vec![RawPoint::xy(20.0, 20.0)],
            parts: Vec::new(),
        }],
        records: vec![vec![text("p")]],
    };
    let mut source = serve(files);
    let out = reconstruct_site(&mut source, PipelineConfig::default()).unwrap();

    assert!(out.buildings.is_empty());
    assert_eq!(Some(Category::Point), out.report.datasets[1].category);
    assert_eq!(1, out.report.buildings.skipped_without_geometry);
    assert_eq!("point_buildings", out.report.warnings[0].code);
}

#[test]
fn sparse_contours_fail_triangulation() {
    let mut files = site();
    files[0] = contours("a:N1L_F0010000", &[(0.0, 0.0, 1.0, 10.0)]);
    files[1] = contours("b:N3L_F0010000", &[(5.0, 5.0, 1.0, 20.0)]);
    let mut source = serve(files);
    let err = reconstruct_site(&mut source, PipelineConfig::default()).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::Triangulation(_))
    ));
}
