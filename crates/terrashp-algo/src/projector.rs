use crate::surface::{Ray, SurfaceIntersector};
use terrashp_core::geom::Vec3;

/// Drops `point` vertically onto `surface`: straight down first, then up.
/// `None` means the point has no terrain above or below it.
pub fn project<S: SurfaceIntersector + ?Sized>(point: Vec3, surface: &S) -> Option<Vec3> {
    [Ray::DOWN, Ray::UP].into_iter().find_map(|direction| {
        let ray = Ray::new(point, direction);
        surface.intersect_ray(&ray).map(|t| ray.point_at(t))
    })
}
