use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unsupported shape type code {code}")]
    UnsupportedShapeType { code: i32 },

    #[error("record {record} has {found} attributes, dataset declares {expected} fields")]
    SchemaMismatch {
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("shapefile holds {shapes} shapes but {records} attribute records")]
    ShapeRecordCountMismatch { shapes: usize, records: usize },

    #[error("required dataset '{0}' not found in any archive")]
    MissingDataset(String),

    #[error("record {record} has no attribute at index {index}")]
    MissingAttribute { record: usize, index: usize },

    #[error("record {record} attribute {index} is not numeric: {value}")]
    NonNumericAttribute {
        record: usize,
        index: usize,
        value: String,
    },

    #[error("resolution must be a positive finite length, got {0}")]
    InvalidResolution(f64),

    #[error("unknown text encoding label '{0}'")]
    UnknownEncoding(String),

    #[error("terrain triangulation failed: {0}")]
    Triangulation(String),
}
