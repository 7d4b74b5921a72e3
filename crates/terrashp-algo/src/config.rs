use crate::building::{BuildingConfig, DEFAULT_FLOOR_HEIGHT, DEFAULT_STORIES_FIELD};
use crate::contour::DEFAULT_ELEVATION_FIELD;
use serde::{Deserialize, Serialize};
use terrashp_core::extract::DEFAULT_ENCODING_LABEL;

/// Contour resampling interval. Smaller values give a denser terrain mesh.
pub const DEFAULT_RESOLUTION: f64 = 4.0;

/// Shapefile name prefixes per dataset, as laid out in the national digital
/// topographic map archives (`N1*` 1:1000, `N3*` 1:5000 sheets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPrefixes {
    pub contour: Vec<String>,
    pub building: Vec<String>,
    pub road_region: Vec<String>,
    pub road_centerline: Vec<String>,
    pub river: Vec<String>,
    pub water: Vec<String>,
}

impl Default for DatasetPrefixes {
    fn default() -> Self {
        let names = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            contour: names(&["N1L_F0010000", "N3L_F0010000"]),
            building: names(&["N1A_B0010000", "N3A_B0010000"]),
            road_region: names(&["N3A_A0010000"]),
            road_centerline: names(&["N3L_A0020000"]),
            river: names(&["N3A_E0010001"]),
            water: names(&["N3A_G0020000"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub resolution: f64,
    pub elevation_field: usize,
    pub stories_field: usize,
    pub floor_height: f64,
    pub encoding: String,
    pub parallel: bool,
    pub prefixes: DatasetPrefixes,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            elevation_field: DEFAULT_ELEVATION_FIELD,
            stories_field: DEFAULT_STORIES_FIELD,
            floor_height: DEFAULT_FLOOR_HEIGHT,
            encoding: DEFAULT_ENCODING_LABEL.to_string(),
            parallel: false,
            prefixes: DatasetPrefixes::default(),
        }
    }
}

impl PipelineConfig {
    pub fn building(&self) -> BuildingConfig {
        BuildingConfig {
            stories_field: self.stories_field,
            floor_height: self.floor_height,
            parallel: self.parallel,
        }
    }
}
