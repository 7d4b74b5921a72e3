use crate::surface::{Ray, SurfaceBuilder, SurfaceIntersector};
use nalgebra::{Point3, Vector3};
use terrashp_core::geom::{BBox2, Vec2, Vec3};
use terrashp_core::{Error, Result};

const EPSILON: f64 = 1e-12;
const EDGE_TOLERANCE: f64 = 1e-9;

/// Delaunay triangulation of a point cloud in plan, keeping each point's Z.
pub struct TinSurface {
    vertices: Vec<Point3<f64>>,
    triangles: Vec<[usize; 3]>,
    grid: TriangleGrid,
}

impl TinSurface {
    pub fn from_points(points: &[Vec3]) -> Result<Self> {
        let plan: Vec<delaunator::Point> = points
            .iter()
            .map(|p| delaunator::Point { x: p.x, y: p.y })
            .collect();
        let triangulation = delaunator::triangulate(&plan);
        if triangulation.triangles.is_empty() {
            return Err(Error::Triangulation(format!(
                "{} points do not span an area",
                points.len()
            )));
        }

        let vertices: Vec<Point3<f64>> =
            points.iter().map(|p| Point3::new(p.x, p.y, p.z)).collect();
        let triangles: Vec<[usize; 3]> = triangulation
            .triangles
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();
        let grid = TriangleGrid::new(&vertices, &triangles);

        Ok(Self {
            vertices,
            triangles,
            grid,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn extents(&self) -> BBox2 {
        self.grid.bbox
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangles.iter().map(|t| {
            t.map(|i| {
                let v = self.vertices[i];
                Vec3::new(v.x, v.y, v.z)
            })
        })
    }

    fn intersect_triangle(&self, tri: &[usize; 3], origin: &Point3<f64>, dir: &Vector3<f64>) -> Option<f64> {
        let v0 = self.vertices[tri[0]];
        let e1 = self.vertices[tri[1]] - v0;
        let e2 = self.vertices[tri[2]] - v0;
        let p = dir.cross(&e2);
        let det = e1.dot(&p);
        if det.abs() < EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let s = origin - v0;
        let u = s.dot(&p) * inv;
        if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
            return None;
        }
        let q = s.cross(&e1);
        let v = dir.dot(&q) * inv;
        if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
            return None;
        }
        let t = e2.dot(&q) * inv;
        (t >= 0.0).then_some(t)
    }
}

impl SurfaceIntersector for TinSurface {
    fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let origin = Point3::new(ray.origin.x, ray.origin.y, ray.origin.z);
        let dir = Vector3::new(ray.direction.x, ray.direction.y, ray.direction.z);
        let vertical = dir.x.abs() < EPSILON && dir.y.abs() < EPSILON;

        let hit = |tri: &[usize; 3]| self.intersect_triangle(tri, &origin, &dir);
        if vertical {
            self.grid
                .candidates(ray.origin.xy())
                .iter()
                .filter_map(|&i| hit(&self.triangles[i as usize]))
                .reduce(f64::min)
        } else {
            self.triangles.iter().filter_map(hit).reduce(f64::min)
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TinBuilder;

impl SurfaceBuilder for TinBuilder {
    type Surface = TinSurface;

    fn build(&self, points: &[Vec3]) -> Result<TinSurface> {
        TinSurface::from_points(points)
    }
}

/// Uniform bucket grid over triangle bounding boxes in plan, used to answer
/// vertical ray queries without scanning every triangle.
struct TriangleGrid {
    bbox: BBox2,
    cell: f64,
    nx: usize,
    ny: usize,
    cells: Vec<Vec<u32>>,
}

impl TriangleGrid {
    fn new(vertices: &[Point3<f64>], triangles: &[[usize; 3]]) -> Self {
        let mut bbox = BBox2::empty();
        for t in triangles {
            for &i in t {
                bbox.include_point(Vec2::new(vertices[i].x, vertices[i].y));
            }
        }

        let per_axis = ((triangles.len() as f64).sqrt().ceil() as usize).max(1);
        let span = bbox.width().max(bbox.height());
        let cell = if span > 0.0 { span / per_axis as f64 } else { 1.0 };
        let nx = (bbox.width() / cell).floor() as usize + 1;
        let ny = (bbox.height() / cell).floor() as usize + 1;

        let mut grid = Self {
            bbox,
            cell,
            nx,
            ny,
            cells: vec![Vec::new(); nx * ny],
        };
        for (ti, t) in triangles.iter().enumerate() {
            let mut tb = BBox2::empty();
            for &i in t {
                tb.include_point(Vec2::new(vertices[i].x, vertices[i].y));
            }
            let (x0, y0) = grid.cell_index(tb.min);
            let (x1, y1) = grid.cell_index(tb.max);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    grid.cells[y * nx + x].push(ti as u32);
                }
            }
        }
        grid
    }

    fn cell_index(&self, p: Vec2) -> (usize, usize) {
        let fx = ((p.x - self.bbox.min.x) / self.cell).floor().max(0.0) as usize;
        let fy = ((p.y - self.bbox.min.y) / self.cell).floor().max(0.0) as usize;
        (fx.min(self.nx - 1), fy.min(self.ny - 1))
    }

    fn candidates(&self, p: Vec2) -> &[u32] {
        let tol = self.cell * EDGE_TOLERANCE;
        let inside = p.x >= self.bbox.min.x - tol
            && p.x <= self.bbox.max.x + tol
            && p.y >= self.bbox.min.y - tol
            && p.y <= self.bbox.max.y + tol;
        if !inside {
            return &[];
        }
        let (x, y) = self.cell_index(p);
        &self.cells[y * self.nx + x]
    }
}
