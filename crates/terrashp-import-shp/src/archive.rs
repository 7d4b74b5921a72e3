use crate::dbf::read_dbf;
use crate::shp::read_shp;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use terrashp_core::raw::RawShapefile;
use tracing::{debug, warn};
use zip::ZipArchive;

struct Archive<R> {
    label: String,
    zip: ZipArchive<R>,
}

/// Ordered set of zip archives searched for shapefiles by name prefix.
pub struct ArchiveSet<R = File> {
    archives: Vec<Archive<R>>,
}

impl ArchiveSet<File> {
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut readers = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let file = File::open(path).with_context(|| format!("open archive: {path:?}"))?;
            readers.push((path.display().to_string(), file));
        }
        Self::from_readers(readers)
    }
}

impl<R: Read + Seek> ArchiveSet<R> {
    pub fn from_readers<I>(readers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, R)>,
    {
        let mut archives = Vec::new();
        for (label, reader) in readers {
            let zip = ZipArchive::new(reader).with_context(|| format!("read zip: {label}"))?;
            archives.push(Archive { label, zip });
        }
        Ok(Self { archives })
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    /// Reads every `{prefix}.shp` + `{prefix}.dbf` pair found, archive by
    /// archive and prefix by prefix. Prefixes an archive does not hold are
    /// skipped.
    pub fn read_shapefiles(&mut self, prefixes: &[String]) -> Result<Vec<RawShapefile>> {
        let mut out = Vec::new();
        for archive in &mut self.archives {
            for prefix in prefixes {
                if let Some(raw) = archive.read_shapefile(prefix)? {
                    out.push(raw);
                }
            }
        }
        Ok(out)
    }

    /// Shapefile prefixes present in each archive, for inspection.
    pub fn prefixes(&self) -> Vec<(String, Vec<String>)> {
        self.archives
            .iter()
            .map(|a| {
                let mut names: Vec<String> = a
                    .zip
                    .file_names()
                    .filter_map(|name| {
                        let file = Path::new(name).file_name()?.to_str()?;
                        let (stem, ext) = file.rsplit_once('.')?;
                        ext.eq_ignore_ascii_case("shp").then(|| stem.to_string())
                    })
                    .collect();
                names.sort();
                (a.label.clone(), names)
            })
            .collect()
    }
}

impl<R: Read + Seek> Archive<R> {
    fn read_shapefile(&mut self, prefix: &str) -> Result<Option<RawShapefile>> {
        let Some(shp_name) = self.find_entry(prefix, "shp") else {
            debug!(archive = %self.label, prefix, "no shapefile for prefix");
            return Ok(None);
        };
        let Some(dbf_name) = self.find_entry(prefix, "dbf") else {
            warn!(archive = %self.label, prefix, "shapefile without .dbf, skipped");
            return Ok(None);
        };

        let shp = self.read_entry(&shp_name)?;
        let dbf = self.read_entry(&dbf_name)?;
        let name = format!("{}:{prefix}", self.label);
        let (shape_type, shapes) = read_shp(&shp).with_context(|| format!("decode {name}.shp"))?;
        let (fields, records) = read_dbf(&dbf).with_context(|| format!("decode {name}.dbf"))?;

        debug!(
            source = %name,
            shape_type,
            shapes = shapes.len(),
            records = records.len(),
            "read shapefile"
        );

        Ok(Some(RawShapefile {
            name,
            shape_type,
            fields,
            shapes,
            records,
        }))
    }

    /// Exact entry name first, then a case-insensitive file name match in
    /// any directory of the archive.
    fn find_entry(&self, prefix: &str, ext: &str) -> Option<String> {
        let wanted = format!("{prefix}.{ext}");
        if self.zip.file_names().any(|n| n == wanted) {
            return Some(wanted);
        }
        self.zip
            .file_names()
            .find(|n| {
                Path::new(n)
                    .file_name()
                    .and_then(|f| f.to_str())
                    .is_some_and(|f| f.eq_ignore_ascii_case(&wanted))
            })
            .map(str::to_string)
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = self
            .zip
            .by_name(name)
            .with_context(|| format!("open {name} in {}", self.label))?;
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut buf)
            .with_context(|| format!("read {name} in {}", self.label))?;
        Ok(buf)
    }
}
