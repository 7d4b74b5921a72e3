//! Data model, shape classification and record extraction for shapefile
//! datasets feeding the terrain/building reconstruction in `terrashp-algo`.

pub mod classify;
pub mod error;
pub mod extract;
pub mod geom;
pub mod model;
pub mod raw;
pub mod report;

pub use error::{Error, Result};
