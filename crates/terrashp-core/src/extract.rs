use crate::classify::classify;
use crate::error::{Error, Result};
use crate::geom::{Polyline3, Vec3};
use crate::model::{AttrValue, Category, Dataset, FieldDescriptor, Geometry, ShapeRecord};
use crate::raw::{RawPoint, RawShape, RawShapefile, RawValue};
use encoding_rs::Encoding;
use tracing::{debug, warn};

pub const DEFAULT_ENCODING_LABEL: &str = "euc-kr";

#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub encoding: &'static Encoding,
}

impl ExtractOptions {
    pub fn from_label(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
        Ok(Self { encoding })
    }

    /// Decodes `bytes`, substituting U+FFFD for malformed sequences.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, had_errors) = self.encoding.decode_without_bom_handling(bytes);
        if had_errors {
            debug!(encoding = self.encoding.name(), "replaced undecodable bytes");
        }
        text.into_owned()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::EUC_KR,
        }
    }
}

pub fn extract(raw: &RawShapefile, opts: &ExtractOptions) -> Result<Dataset> {
    let category = classify(raw.shape_type).ok_or(Error::UnsupportedShapeType {
        code: raw.shape_type,
    })?;

    let fields: Vec<FieldDescriptor> = raw
        .fields
        .iter()
        .enumerate()
        .filter(|(i, f)| !(*i == 0 && f.is_deletion_flag()))
        .map(|(_, f)| FieldDescriptor {
            name: opts.decode(&f.name),
            field_type: f.field_type,
            length: f.length,
            decimal_count: f.decimal_count,
        })
        .collect();

    if raw.shapes.len() != raw.records.len() {
        return Err(Error::ShapeRecordCountMismatch {
            shapes: raw.shapes.len(),
            records: raw.records.len(),
        });
    }

    let mut records = Vec::with_capacity(raw.records.len());
    for (idx, (shape, values)) in raw.shapes.iter().zip(&raw.records).enumerate() {
        if values.len() != fields.len() {
            return Err(Error::SchemaMismatch {
                record: idx,
                expected: fields.len(),
                found: values.len(),
            });
        }
        records.push(ShapeRecord {
            geometry: decode_geometry(shape, category),
            attributes: values.iter().map(|v| decode_value(v, opts)).collect(),
        });
    }

    debug!(
        source = %raw.name,
        %category,
        fields = fields.len(),
        records = records.len(),
        "extracted shapefile"
    );

    Ok(Dataset {
        category: Some(category),
        fields,
        records,
    })
}

/// Extracts every source and concatenates the results in source order. The
/// first source fixes the category; field lists are appended as encountered
/// and are not checked against each other.
pub fn aggregate<'a, I>(sources: I, opts: &ExtractOptions) -> Result<Dataset>
where
    I: IntoIterator<Item = &'a RawShapefile>,
{
    let mut out = Dataset::default();
    for raw in sources {
        let ds = extract(raw, opts)?;
        match (out.category, ds.category) {
            (None, c) => out.category = c,
            (Some(a), Some(b)) if a != b => {
                warn!(source = %raw.name, expected = %a, found = %b, "category differs from first source");
            }
            _ => {}
        }
        if !out.fields.is_empty() && out.fields.len() != ds.fields.len() {
            warn!(
                source = %raw.name,
                expected = out.fields.len(),
                found = ds.fields.len(),
                "field count differs from first source"
            );
        }
        out.fields.extend(ds.fields);
        out.records.extend(ds.records);
    }
    Ok(out)
}

fn decode_geometry(shape: &RawShape, category: Category) -> Geometry {
    match category {
        Category::Point => Geometry::PointCloud(shape.points.iter().map(lift).collect()),
        Category::Polyline => Geometry::PolylineSet(split_parts(shape)),
    }
}

fn split_parts(shape: &RawShape) -> Vec<Polyline3> {
    let n = shape.points.len();
    if shape.parts.is_empty() {
        if n == 0 {
            return Vec::new();
        }
        return vec![Polyline3::new(shape.points.iter().map(lift).collect())];
    }

    let mut parts = Vec::with_capacity(shape.parts.len());
    for (i, &offset) in shape.parts.iter().enumerate() {
        let start = offset.min(n);
        let end = shape.parts.get(i + 1).copied().unwrap_or(n).clamp(start, n);
        parts.push(Polyline3::new(
            shape.points[start..end].iter().map(lift).collect(),
        ));
    }
    parts
}

fn lift(p: &RawPoint) -> Vec3 {
    Vec3::new(p.x, p.y, p.z.unwrap_or(0.0))
}

fn decode_value(value: &RawValue, opts: &ExtractOptions) -> AttrValue {
    match value {
        RawValue::Bytes(bytes) => AttrValue::Text(opts.decode(bytes)),
        RawValue::Number(n) => AttrValue::Number(*n),
        RawValue::Logical(b) => AttrValue::Logical(*b),
        RawValue::Null => AttrValue::Null,
    }
}
