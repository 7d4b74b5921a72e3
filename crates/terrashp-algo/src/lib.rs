use anyhow::Result;

pub mod building;
pub mod config;
pub mod contour;
pub mod pipeline;
pub mod projector;
pub mod sampler;
pub mod surface;
pub mod tin;

use config::PipelineConfig;
use pipeline::{DatasetSource, Pipeline, PipelineOutput};
use tin::{TinBuilder, TinSurface};

/// Runs the whole reconstruction with a Delaunay terrain.
pub fn reconstruct_site<D: DatasetSource + ?Sized>(
    source: &mut D,
    cfg: PipelineConfig,
) -> Result<PipelineOutput<TinSurface>> {
    Pipeline::new(cfg).run(source, &TinBuilder)
}
