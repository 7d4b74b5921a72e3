use crate::contour::numeric_attribute;
use crate::projector::project;
use crate::surface::SurfaceIntersector;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use terrashp_core::geom::{Polyline3, Vec3};
use terrashp_core::model::Dataset;
use terrashp_core::Result;
use tracing::{debug, warn};

/// Field holding the number of stories in the national building schema.
pub const DEFAULT_STORIES_FIELD: usize = 5;
pub const DEFAULT_FLOOR_HEIGHT: f64 = 3.5;

/// A footprint resting on the terrain, extruded straight up by `height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingVolume {
    pub source_index: usize,
    pub footprint: Polyline3,
    /// Terrain contact height of the first footprint vertex. Other vertices
    /// keep their offsets from it, so this is not the footprint's minimum Z.
    pub base_z: f64,
    pub height: f64,
    pub capped: bool,
}

impl BuildingVolume {
    pub fn top_z(&self) -> f64 {
        self.base_z + self.height
    }

    pub fn top(&self) -> Polyline3 {
        self.footprint.translated(Vec3::new(0.0, 0.0, self.height))
    }

    /// Planar faces of the volume: bottom and top caps (when capped) followed
    /// by one quad per footprint span.
    pub fn faces(&self) -> Vec<Vec<Vec3>> {
        let lift = Vec3::new(0.0, 0.0, self.height);
        let ring = self.footprint.vertices();
        let mut faces = Vec::with_capacity(ring.len() + 2);
        if self.capped {
            faces.push(ring.iter().rev().copied().collect());
            faces.push(ring.iter().map(|p| *p + lift).collect());
        }
        for pair in self.footprint.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            faces.push(vec![a, b, b + lift, a + lift]);
        }
        faces
    }
}

#[derive(Debug, Clone)]
pub struct BuildingConfig {
    pub stories_field: usize,
    pub floor_height: f64,
    pub parallel: bool,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            stories_field: DEFAULT_STORIES_FIELD,
            floor_height: DEFAULT_FLOOR_HEIGHT,
            parallel: false,
        }
    }
}

/// Places `footprint` on `terrain` and extrudes it by `stories * floor_height`.
///
/// The footprint is moved so that its first vertex lands on the lowest
/// terrain contact found under any vertex. Returns `None` when no vertex
/// projects onto the terrain.
pub fn reconstruct<S: SurfaceIntersector + ?Sized>(
    footprint: &Polyline3,
    stories: f64,
    terrain: &S,
    floor_height: f64,
) -> Option<BuildingVolume> {
    let vertices = footprint.vertices();
    let anchor = vertices.first()?;

    let min_z = vertices
        .iter()
        .filter_map(|v| project(*v, terrain))
        .map(|p| p.z)
        .reduce(f64::min)?;

    Some(BuildingVolume {
        source_index: 0,
        footprint: footprint.translated(Vec3::new(0.0, 0.0, min_z - anchor.z)),
        base_z: min_z,
        height: stories * floor_height,
        capped: footprint.is_closed(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct BuildingBatch {
    pub volumes: Vec<BuildingVolume>,
    pub unprojectable: usize,
    pub skipped_without_geometry: usize,
}

/// Reconstructs every building record of `dataset`, keeping record order.
/// Stories are read from `cfg.stories_field`; records without a polyline
/// part are skipped.
pub fn reconstruct_buildings<S: SurfaceIntersector + ?Sized>(
    dataset: &Dataset,
    terrain: &S,
    cfg: &BuildingConfig,
) -> Result<BuildingBatch> {
    let mut batch = BuildingBatch::default();
    let mut jobs = Vec::with_capacity(dataset.len());
    for (idx, record) in dataset.records.iter().enumerate() {
        let Some(footprint) = record.geometry.first_part() else {
            batch.skipped_without_geometry += 1;
            continue;
        };
        let stories = numeric_attribute(record, idx, cfg.stories_field)?;
        jobs.push((idx, footprint, stories));
    }

    let run = |&(idx, footprint, stories): &(usize, &Polyline3, f64)| {
        reconstruct(footprint, stories, terrain, cfg.floor_height).map(|mut v| {
            v.source_index = idx;
            v
        })
    };
    let results: Vec<Option<BuildingVolume>> = if cfg.parallel {
        jobs.par_iter().map(run).collect()
    } else {
        jobs.iter().map(run).collect()
    };

    for (result, (idx, _, _)) in results.into_iter().zip(&jobs) {
        match result {
            Some(volume) => batch.volumes.push(volume),
            None => {
                debug!(record = idx, "footprint does not touch the terrain");
                batch.unprojectable += 1;
            }
        }
    }

    if batch.unprojectable > 0 {
        warn!(
            dropped = batch.unprojectable,
            total = jobs.len(),
            "buildings outside the terrain were dropped"
        );
    }

    Ok(batch)
}
