use crate::model::Category;

/// POINT, MULTIPOINT, POINTZ, MULTIPOINTZ, POINTM, MULTIPOINTM.
pub const POINT_SHAPE_TYPES: [i32; 6] = [1, 8, 11, 18, 21, 28];

/// POLYLINE, POLYGON, POLYLINEZ, POLYGONZ, POLYLINEM, POLYGONM, MULTIPATCH.
pub const POLYLINE_SHAPE_TYPES: [i32; 7] = [3, 5, 13, 15, 23, 25, 31];

pub fn classify(shape_type: i32) -> Option<Category> {
    if POINT_SHAPE_TYPES.contains(&shape_type) {
        Some(Category::Point)
    } else if POLYLINE_SHAPE_TYPES.contains(&shape_type) {
        Some(Category::Polyline)
    } else {
        None
    }
}

impl Category {
    pub fn shape_type_codes(&self) -> &'static [i32] {
        match self {
            Category::Point => &POINT_SHAPE_TYPES,
            Category::Polyline => &POLYLINE_SHAPE_TYPES,
        }
    }
}
