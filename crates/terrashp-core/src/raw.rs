//! Undecoded shapefile content as handed over by an archive reader.
//!
//! Text stays as raw bytes here; decoding happens in [`crate::extract`] with
//! the caller's chosen encoding.

/// Name of the pseudo-field some readers put in front of the real dBASE
/// fields to describe the per-record deletion marker.
pub const DELETION_FLAG: &[u8] = b"DeletionFlag";

#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub name: Vec<u8>,
    pub field_type: char,
    pub length: u8,
    pub decimal_count: u8,
}

impl RawField {
    pub fn is_deletion_flag(&self) -> bool {
        self.name == DELETION_FLAG
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl RawPoint {
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

/// One shape record. `parts` holds the start offset of every part into
/// `points`; it is empty for point-family shapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawShape {
    pub points: Vec<RawPoint>,
    pub parts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Bytes(Vec<u8>),
    Number(f64),
    Logical(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawShapefile {
    pub name: String,
    pub shape_type: i32,
    pub fields: Vec<RawField>,
    pub shapes: Vec<RawShape>,
    pub records: Vec<Vec<RawValue>>,
}
