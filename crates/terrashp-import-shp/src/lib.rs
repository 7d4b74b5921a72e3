//! Zip archive lookup and `.shp`/`.dbf` decoding into
//! [`terrashp_core::raw::RawShapefile`].

mod archive;
pub mod dbf;
pub mod shp;

pub use archive::ArchiveSet;
