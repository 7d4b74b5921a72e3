use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use terrashp_algo::building::BuildingVolume;
use terrashp_algo::config::PipelineConfig;
use terrashp_core::extract::{aggregate, ExtractOptions};
use terrashp_core::geom::{Polyline3, Vec3};
use terrashp_core::report::{DatasetReport, PipelineReport};
use terrashp_import_shp::ArchiveSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "terrashp")]
#[command(about = "Contour terrain and building volumes from digital map shapefile archives.")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the terrain and building volumes.
    Build {
        #[arg(required = true)]
        archives: Vec<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        resolution: Option<f64>,
        #[arg(long)]
        encoding: Option<String>,
        #[arg(long)]
        parallel: bool,
        #[arg(long)]
        report: Option<PathBuf>,
        #[arg(long)]
        dump: Option<PathBuf>,
    },
    /// List the shapefiles held by each archive, or summarize some of them.
    Inspect {
        #[arg(required = true)]
        archives: Vec<PathBuf>,
        #[arg(long = "prefix")]
        prefixes: Vec<String>,
        #[arg(long, default_value = terrashp_core::extract::DEFAULT_ENCODING_LABEL)]
        encoding: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Build {
            archives,
            config,
            resolution,
            encoding,
            parallel,
            report,
            dump,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if let Some(resolution) = resolution {
                cfg.resolution = resolution;
            }
            if let Some(encoding) = encoding {
                cfg.encoding = encoding;
            }
            cfg.parallel |= parallel;
            build(&archives, cfg, report.as_deref(), dump.as_deref())
        }
        Command::Inspect {
            archives,
            prefixes,
            encoding,
        } => inspect(&archives, &prefixes, &encoding),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    ensure_input_file(path)?;
    let text = std::fs::read_to_string(path).with_context(|| format!("read config: {path:?}"))?;
    serde_json::from_str(&text).with_context(|| format!("parse config: {path:?}"))
}

#[derive(Serialize)]
struct BuildReport<'a> {
    generated_at: String,
    archives: Vec<String>,
    config: &'a PipelineConfig,
    #[serde(flatten)]
    report: &'a PipelineReport,
    terrain_triangles: usize,
}

#[derive(Serialize)]
struct SiteDump<'a> {
    contours: &'a [Polyline3],
    terrain_triangles: Vec<[Vec3; 3]>,
    buildings: &'a [BuildingVolume],
    road_regions: &'a [Polyline3],
    road_centerlines: &'a [Polyline3],
    rivers: &'a [Polyline3],
    water: &'a [Polyline3],
}

fn build(
    archives: &[PathBuf],
    cfg: PipelineConfig,
    report: Option<&Path>,
    dump: Option<&Path>,
) -> Result<()> {
    for path in archives {
        ensure_input_file(path)?;
    }
    let mut set = ArchiveSet::open(archives)?;
    let mut source = |prefixes: &[String]| set.read_shapefiles(prefixes);
    let out = terrashp_algo::reconstruct_site(&mut source, cfg.clone())?;
    info!(
        triangles = out.terrain.triangle_count(),
        buildings = out.buildings.len(),
        "site reconstructed"
    );

    if let Some(path) = dump {
        let site = SiteDump {
            contours: &out.contours,
            terrain_triangles: out.terrain.triangles().collect(),
            buildings: &out.buildings,
            road_regions: &out.road_regions,
            road_centerlines: &out.road_centerlines,
            rivers: &out.rivers,
            water: &out.water,
        };
        let json = serde_json::to_string(&site).context("serialize dump")?;
        write_output(path, &json).with_context(|| format!("write dump: {path:?}"))?;
    }

    let report_data = BuildReport {
        generated_at: Utc::now().to_rfc3339(),
        archives: archives.iter().map(|p| p.display().to_string()).collect(),
        config: &cfg,
        report: &out.report,
        terrain_triangles: out.terrain.triangle_count(),
    };
    let json = serde_json::to_string_pretty(&report_data).context("serialize report")?;

    if let Some(path) = report {
        write_output(path, &json).with_context(|| format!("write report: {path:?}"))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

#[derive(Serialize)]
struct ArchiveListing {
    archive: String,
    shapefiles: Vec<String>,
}

fn inspect(archives: &[PathBuf], prefixes: &[String], encoding: &str) -> Result<()> {
    for path in archives {
        ensure_input_file(path)?;
    }
    let mut set = ArchiveSet::open(archives)?;

    let json = if prefixes.is_empty() {
        let listing: Vec<ArchiveListing> = set
            .prefixes()
            .into_iter()
            .map(|(archive, shapefiles)| ArchiveListing {
                archive,
                shapefiles,
            })
            .collect();
        serde_json::to_string_pretty(&listing)
    } else {
        let opts = ExtractOptions::from_label(encoding)?;
        let mut summaries = Vec::with_capacity(prefixes.len());
        for prefix in prefixes {
            let group = std::slice::from_ref(prefix);
            let raws = set.read_shapefiles(group)?;
            let dataset =
                aggregate(&raws, &opts).with_context(|| format!("extract dataset: {prefix}"))?;
            summaries.push(DatasetReport::new(prefix, group, raws.len(), &dataset));
        }
        serde_json::to_string_pretty(&summaries)
    }
    .context("serialize inspection")?;

    println!("{json}");
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    std::fs::write(path, contents)?;
    Ok(())
}

fn ensure_input_file(input: &Path) -> Result<()> {
    match std::fs::metadata(input) {
        Ok(meta) => {
            if meta.is_file() {
                Ok(())
            } else {
                bail!("input is not a file: {input:?}");
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            bail!("input not found: {input:?} (cwd: {cwd:?}).");
        }
        Err(err) => Err(err).with_context(|| format!("stat input: {input:?}")),
    }
}
