use crate::geom::{Polyline3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Point,
    Polyline,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Point => f.write_str("point"),
            Category::Polyline => f.write_str("polyline"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Logical(bool),
    Null,
}

impl AttrValue {
    /// Numeric view of the value. Text is accepted when it parses as a
    /// number, since dBASE sources often store counts in character fields.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(s) => s.trim().parse().ok(),
            AttrValue::Logical(_) | AttrValue::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => write!(f, "{s:?}"),
            AttrValue::Number(n) => write!(f, "{n}"),
            AttrValue::Logical(b) => write!(f, "{b}"),
            AttrValue::Null => f.write_str("null"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: char,
    pub length: u8,
    pub decimal_count: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Geometry {
    PointCloud(Vec<Vec3>),
    PolylineSet(Vec<Polyline3>),
}

impl Geometry {
    pub fn first_part(&self) -> Option<&Polyline3> {
        match self {
            Geometry::PolylineSet(parts) => parts.first(),
            Geometry::PointCloud(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub geometry: Geometry,
    pub attributes: Vec<AttrValue>,
}

impl ShapeRecord {
    pub fn attribute(&self, index: usize) -> Option<&AttrValue> {
        self.attributes.get(index)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub category: Option<Category>,
    pub fields: Vec<FieldDescriptor>,
    pub records: Vec<ShapeRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// First part of every polyline record, in record order. Records without
    /// parts and point records are skipped.
    pub fn first_parts(&self) -> Vec<Polyline3> {
        self.records
            .iter()
            .filter_map(|r| r.geometry.first_part().cloned())
            .collect()
    }
}
