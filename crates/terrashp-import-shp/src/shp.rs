use anyhow::{bail, ensure, Context, Result};
use terrashp_core::raw::{RawPoint, RawShape};

const FILE_CODE: i32 = 9994;
const HEADER_LEN: usize = 100;

/// Decodes a `.shp` main file into its declared shape type and shapes.
/// M values are read past and dropped.
pub fn read_shp(bytes: &[u8]) -> Result<(i32, Vec<RawShape>)> {
    ensure!(bytes.len() >= HEADER_LEN, "shp header truncated ({} bytes)", bytes.len());
    let mut header = ByteReader::new(&bytes[..HEADER_LEN]);
    let code = header.i32_be()?;
    ensure!(code == FILE_CODE, "not a shapefile (file code {code})");
    header.skip(20)?;
    let declared_len = header.i32_be()?.max(0) as usize * 2;
    header.skip(4)?;
    let shape_type = header.i32_le()?;

    let end = declared_len.clamp(HEADER_LEN, bytes.len());
    let mut shapes = Vec::new();
    let mut pos = HEADER_LEN;
    while pos + 8 <= end {
        let mut rec = ByteReader::new(&bytes[pos..pos + 8]);
        let number = rec.i32_be()?;
        let content_len = rec.i32_be()?.max(0) as usize * 2;
        let start = pos + 8;
        let stop = start + content_len;
        ensure!(stop <= bytes.len(), "shp record {number} truncated");
        let shape = read_shape(&bytes[start..stop])
            .with_context(|| format!("shp record {number}"))?;
        shapes.push(shape);
        pos = stop;
    }

    Ok((shape_type, shapes))
}

fn read_shape(content: &[u8]) -> Result<RawShape> {
    let mut r = ByteReader::new(content);
    let shape_type = r.i32_le()?;
    let shape = match shape_type {
        0 => RawShape::default(),
        1 | 21 => {
            let (x, y) = (r.f64_le()?, r.f64_le()?);
            RawShape {
                points: vec![RawPoint::xy(x, y)],
                parts: Vec::new(),
            }
        }
        11 => {
            let (x, y, z) = (r.f64_le()?, r.f64_le()?, r.f64_le()?);
            RawShape {
                points: vec![RawPoint::xyz(x, y, z)],
                parts: Vec::new(),
            }
        }
        8 | 18 | 28 => {
            r.skip(32)?;
            let n = r.count()?;
            let mut points = r.xy_points(n)?;
            if shape_type == 18 {
                r.read_z(&mut points)?;
            }
            RawShape {
                points,
                parts: Vec::new(),
            }
        }
        3 | 5 | 13 | 15 | 23 | 25 | 31 => {
            r.skip(32)?;
            let num_parts = r.count()?;
            let n = r.count()?;
            ensure!(
                num_parts.saturating_mul(4) <= r.remaining(),
                "part table of {num_parts} exceeds record"
            );
            let mut parts = Vec::with_capacity(num_parts);
            for _ in 0..num_parts {
                parts.push(r.i32_le()?.max(0) as usize);
            }
            if shape_type == 31 {
                // part types
                r.skip(num_parts * 4)?;
            }
            let mut points = r.xy_points(n)?;
            if matches!(shape_type, 13 | 15 | 31) {
                r.read_z(&mut points)?;
            }
            RawShape { points, parts }
        }
        other => bail!("unknown shape type {other}"),
    };
    Ok(shape)
}

struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.pos + N;
        let slice = self
            .buf
            .get(self.pos..end)
            .with_context(|| format!("unexpected end of data at byte {}", self.pos))?;
        self.pos = end;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        ensure!(
            self.pos + n <= self.buf.len(),
            "unexpected end of data at byte {}",
            self.pos
        );
        self.pos += n;
        Ok(())
    }

    fn i32_be(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    fn i32_le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    fn f64_le(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.take()?))
    }

    fn count(&mut self) -> Result<usize> {
        let n = self.i32_le()?;
        ensure!(n >= 0, "negative element count {n}");
        Ok(n as usize)
    }

    fn xy_points(&mut self, n: usize) -> Result<Vec<RawPoint>> {
        ensure!(
            n.saturating_mul(16) <= self.remaining(),
            "point array of {n} exceeds record"
        );
        let mut points = Vec::with_capacity(n);
        for _ in 0..n {
            points.push(RawPoint::xy(self.f64_le()?, self.f64_le()?));
        }
        Ok(points)
    }

    fn read_z(&mut self, points: &mut [RawPoint]) -> Result<()> {
        // z range
        self.skip(16)?;
        for p in points.iter_mut() {
            p.z = Some(self.f64_le()?);
        }
        Ok(())
    }
}
