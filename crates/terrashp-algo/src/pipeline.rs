use crate::building::{reconstruct_buildings, BuildingVolume};
use crate::config::PipelineConfig;
use crate::contour::build_contours;
use crate::sampler::sample;
use crate::surface::SurfaceBuilder;
use anyhow::{Context, Result};
use terrashp_core::extract::{aggregate, ExtractOptions};
use terrashp_core::geom::{BBox2, Polyline3, Vec3};
use terrashp_core::model::{Category, Dataset};
use terrashp_core::raw::RawShapefile;
use terrashp_core::report::{BuildingReport, DatasetReport, PipelineReport, TerrainReport, Warning};
use terrashp_core::Error;
use tracing::{info, warn};

/// Supplies the raw shapefiles stored under a list of name prefixes.
pub trait DatasetSource {
    fn load(&mut self, prefixes: &[String]) -> Result<Vec<RawShapefile>>;
}

impl<F> DatasetSource for F
where
    F: FnMut(&[String]) -> Result<Vec<RawShapefile>>,
{
    fn load(&mut self, prefixes: &[String]) -> Result<Vec<RawShapefile>> {
        self(prefixes)
    }
}

pub struct PipelineOutput<S> {
    pub contours: Vec<Polyline3>,
    pub terrain_points: Vec<Vec3>,
    pub terrain: S,
    pub buildings: Vec<BuildingVolume>,
    pub road_regions: Vec<Polyline3>,
    pub road_centerlines: Vec<Polyline3>,
    pub rivers: Vec<Polyline3>,
    pub water: Vec<Polyline3>,
    pub report: PipelineReport,
}

pub struct Pipeline {
    cfg: PipelineConfig,
}

impl Pipeline {
    pub fn new(cfg: PipelineConfig) -> Self {
        Self { cfg }
    }

    pub fn run<D, B>(&self, source: &mut D, builder: &B) -> Result<PipelineOutput<B::Surface>>
    where
        D: DatasetSource + ?Sized,
        B: SurfaceBuilder,
    {
        let opts = ExtractOptions::from_label(&self.cfg.encoding)?;
        let prefixes = &self.cfg.prefixes;
        let mut report = PipelineReport::default();

        let contour_data = load_dataset(source, &opts, "contour", &prefixes.contour, true, &mut report)?;
        let building_data =
            load_dataset(source, &opts, "building", &prefixes.building, true, &mut report)?;
        let road_region_data =
            load_dataset(source, &opts, "road_region", &prefixes.road_region, false, &mut report)?;
        let road_centerline_data = load_dataset(
            source,
            &opts,
            "road_centerline",
            &prefixes.road_centerline,
            false,
            &mut report,
        )?;
        let river_data = load_dataset(source, &opts, "river", &prefixes.river, false, &mut report)?;
        let water_data = load_dataset(source, &opts, "water", &prefixes.water, false, &mut report)?;

        if building_data.category == Some(Category::Point) {
            report.warnings.push(Warning {
                code: "point_buildings".to_string(),
                message: "Building dataset holds points; no footprints to extrude.".to_string(),
            });
        }

        let contours = build_contours(&contour_data.records, self.cfg.elevation_field)
            .context("build contour curves")?;
        let degenerate = contours.iter().filter(|c| c.length() <= 0.0).count();
        if degenerate > 0 {
            report.warnings.push(Warning {
                code: "degenerate_contours".to_string(),
                message: format!("{degenerate} contour records have no length."),
            });
        }

        let terrain_points = sample(&contours, self.cfg.resolution).context("sample contours")?;
        let mut extents = BBox2::empty();
        for p in &terrain_points {
            extents.include_point(p.xy());
        }
        info!(
            contours = contours.len(),
            points = terrain_points.len(),
            resolution = self.cfg.resolution,
            "sampled contours"
        );
        report.terrain = TerrainReport {
            contours: contours.len(),
            degenerate_contours: degenerate,
            sample_points: terrain_points.len(),
            resolution: self.cfg.resolution,
            extents: (!extents.is_empty()).then_some(extents),
        };

        let terrain = builder
            .build(&terrain_points)
            .context("build terrain surface")?;

        let batch = reconstruct_buildings(&building_data, &terrain, &self.cfg.building())
            .context("reconstruct buildings")?;
        info!(
            footprints = building_data.len(),
            volumes = batch.volumes.len(),
            "reconstructed buildings"
        );
        if batch.unprojectable > 0 {
            report.warnings.push(Warning {
                code: "unprojectable_buildings".to_string(),
                message: format!(
                    "{} buildings lie outside the terrain and were dropped.",
                    batch.unprojectable
                ),
            });
        }
        report.buildings = BuildingReport {
            footprints: building_data.len(),
            volumes: batch.volumes.len(),
            unprojectable: batch.unprojectable,
            skipped_without_geometry: batch.skipped_without_geometry,
        };

        let road_regions = road_region_data.first_parts();
        let road_centerlines = road_centerline_data.first_parts();
        let rivers = river_data.first_parts();
        let water = water_data.first_parts();
        report.road_regions = road_regions.len();
        report.road_centerlines = road_centerlines.len();
        report.rivers = rivers.len();
        report.water = water.len();

        Ok(PipelineOutput {
            contours,
            terrain_points,
            terrain,
            buildings: batch.volumes,
            road_regions,
            road_centerlines,
            rivers,
            water,
            report,
        })
    }
}

fn load_dataset<D: DatasetSource + ?Sized>(
    source: &mut D,
    opts: &ExtractOptions,
    name: &str,
    prefixes: &[String],
    required: bool,
    report: &mut PipelineReport,
) -> Result<Dataset> {
    let raws = source
        .load(prefixes)
        .with_context(|| format!("load {name} shapefiles"))?;
    if raws.is_empty() {
        if required {
            return Err(Error::MissingDataset(name.to_string()).into());
        }
        warn!(dataset = name, ?prefixes, "optional dataset not found");
    }

    let dataset = aggregate(&raws, opts).with_context(|| format!("extract {name} dataset"))?;
    info!(
        dataset = name,
        sources = raws.len(),
        records = dataset.len(),
        "loaded dataset"
    );
    report
        .datasets
        .push(DatasetReport::new(name, prefixes, raws.len(), &dataset));
    Ok(dataset)
}
