use itertools::Itertools;
use terrashp_core::geom::{Polyline3, Vec3};
use terrashp_core::{Error, Result};

const LENGTH_TOLERANCE: f64 = 1e-9;

/// Resamples every curve at `resolution` and concatenates the points in curve
/// order. Curves shorter than `resolution` contribute nothing; coincident
/// points across curves are kept.
pub fn sample(curves: &[Polyline3], resolution: f64) -> Result<Vec<Vec3>> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(Error::InvalidResolution(resolution));
    }
    let mut points = Vec::new();
    for curve in curves {
        let lengths = division_lengths(curve.length(), resolution, curve.is_closed());
        points.extend(points_at_lengths(curve, &lengths));
    }
    Ok(points)
}

/// Arc lengths at which a curve of `length` is divided every `resolution`,
/// start included. Open curves also get their end; closed curves stop short
/// of it since it repeats the start.
pub fn division_lengths(length: f64, resolution: f64, closed: bool) -> Vec<f64> {
    if !length.is_finite() || length <= 0.0 {
        return Vec::new();
    }
    let tol = length * LENGTH_TOLERANCE;
    if length < resolution - tol {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut i = 0usize;
    loop {
        let s = i as f64 * resolution;
        if s > length - tol {
            break;
        }
        out.push(s);
        i += 1;
    }
    if !closed {
        out.push(length);
    }
    out
}

/// Evaluates ascending arc lengths in a single walk along the curve.
fn points_at_lengths(curve: &Polyline3, lengths: &[f64]) -> Vec<Vec3> {
    let Some(&last) = curve.points.last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(lengths.len());
    let mut segments = curve.points.iter().tuple_windows::<(_, _)>().peekable();
    let mut walked = 0.0;
    for &s in lengths {
        loop {
            let Some(&(a, b)) = segments.peek() else {
                out.push(last);
                break;
            };
            let seg = a.distance(b);
            if seg > 0.0 && walked + seg >= s {
                out.push(a.lerp(b, ((s - walked) / seg).max(0.0)));
                break;
            }
            walked += seg;
            segments.next();
        }
    }
    out
}
