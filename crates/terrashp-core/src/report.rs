use crate::geom::BBox2;
use crate::model::{Category, Dataset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetReport {
    pub name: String,
    pub prefixes: Vec<String>,
    pub sources: usize,
    pub category: Option<Category>,
    pub field_names: Vec<String>,
    pub records: usize,
}

impl DatasetReport {
    pub fn new(name: &str, prefixes: &[String], sources: usize, dataset: &Dataset) -> Self {
        Self {
            name: name.to_string(),
            prefixes: prefixes.to_vec(),
            sources,
            category: dataset.category,
            field_names: dataset.fields.iter().map(|f| f.name.clone()).collect(),
            records: dataset.len(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainReport {
    pub contours: usize,
    pub degenerate_contours: usize,
    pub sample_points: usize,
    pub resolution: f64,
    pub extents: Option<BBox2>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildingReport {
    pub footprints: usize,
    pub volumes: usize,
    pub unprojectable: usize,
    pub skipped_without_geometry: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineReport {
    pub datasets: Vec<DatasetReport>,
    pub terrain: TerrainReport,
    pub buildings: BuildingReport,
    pub road_regions: usize,
    pub road_centerlines: usize,
    pub rivers: usize,
    pub water: usize,
    pub warnings: Vec<Warning>,
}
