use terrashp_core::geom::{Polyline3, Vec3};
use terrashp_core::model::ShapeRecord;
use terrashp_core::{Error, Result};

/// Field holding the contour elevation in the national topographic schema.
pub const DEFAULT_ELEVATION_FIELD: usize = 1;

/// Builds one closed contour per record from the first geometry part, every
/// vertex lifted to the record's elevation. Further parts are ignored.
pub fn build_contours<'a, I>(records: I, elevation_field: usize) -> Result<Vec<Polyline3>>
where
    I: IntoIterator<Item = &'a ShapeRecord>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let elevation = numeric_attribute(record, idx, elevation_field)?;
            let points = record
                .geometry
                .first_part()
                .map(|part| {
                    part.points
                        .iter()
                        .map(|p| Vec3::new(p.x, p.y, elevation))
                        .collect()
                })
                .unwrap_or_default();
            Ok(Polyline3::closed(points))
        })
        .collect()
}

pub(crate) fn numeric_attribute(record: &ShapeRecord, idx: usize, field: usize) -> Result<f64> {
    let value = record.attribute(field).ok_or(Error::MissingAttribute {
        record: idx,
        index: field,
    })?;
    value.as_f64().ok_or_else(|| Error::NonNumericAttribute {
        record: idx,
        index: field,
        value: value.to_string(),
    })
}
