use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use eyre::{Result, WrapErr};
use hull_pipeline::{reconstruct_with_report, Mesh, ReconstructionParams, Report, ViewImages};
use log::error;
use serde::Serialize;

/// Reconstruct a solid from front, top and side silhouettes.
///
/// Prints a JSON summary of the resulting mesh to stdout.
#[derive(Debug, Parser)]
#[command(name = "orthohull", version)]
struct Args {
    /// Front view image (looking along -Z).
    #[arg(long)]
    front: PathBuf,
    /// Top view image (looking down along -Y).
    #[arg(long)]
    top: PathBuf,
    /// Side view image (looking along -X).
    #[arg(long)]
    side: PathBuf,
    /// JSON parameter file; missing fields use defaults.
    #[arg(long)]
    params: Option<PathBuf>,
    /// Pretty-print the summary.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    vertices: usize,
    triangles: usize,
    bounding_box: [[f64; 3]; 2],
    volume: f64,
    total_ms: f64,
    #[serde(flatten)]
    report: Report,
}

impl Summary {
    fn new(mesh: &Mesh, report: Report, total_ms: f64) -> Self {
        let (min, max) = mesh.bounding_box();
        Self {
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            bounding_box: [min.to_array(), max.to_array()],
            volume: mesh.signed_volume(),
            total_ms,
            report,
        }
    }
}

fn run(args: &Args) -> Result<String> {
    let params = match &args.params {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("reading {}", path.display()))?;
            ReconstructionParams::from_json(&json)
                .wrap_err_with(|| format!("loading parameters from {}", path.display()))?
        }
        None => ReconstructionParams::default(),
    };

    let images = ViewImages::from_files(&args.front, &args.top, &args.side)
        .wrap_err("reading view images")?;

    let start = Instant::now();
    let (mesh, report) = reconstruct_with_report(&images, &params)?;
    let summary = Summary::new(&mesh, report, start.elapsed().as_secs_f64() * 1000.0);

    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    env_logger::builder().init();
    let args = Args::parse();

    let summary = run(&args).inspect_err(|err| error!("{err:#}"))?;
    println!("{summary}");
    Ok(())
}
