//! sascloud CLI - sample 3D solids into inside-point clouds.
//!
//! Converts an STL mesh or an analytic boolean predicate into a cloud of
//! regular-grid points inside the solid, annotated with a scattering-length
//! density, and writes it in XYZ or PDB form for downstream scattering
//! calculators.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use sascloud_math::Aabb;
use sascloud_mesh::TriMesh;
use sascloud_predicate::Predicate;
use sascloud_sample::{sample_mesh, sample_predicate, SampleCloud, SampleSettings};

#[derive(Parser)]
#[command(name = "sascloud")]
#[command(about = "Sample 3D solids into scattering point clouds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a closed STL mesh into a point cloud
    Mesh {
        /// Input STL file (binary or ASCII)
        input: PathBuf,
        /// Output file (default: input stem + format extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        sampling: SamplingArgs,
        /// Skip the watertightness check
        #[arg(long)]
        allow_open: bool,
    },
    /// Sample an analytic solid given as a boolean expression over x,y,z
    Predicate {
        /// Boolean expression, e.g. "x**2+y**2+z**2 <= 25"
        expression: String,
        /// Bounding box as xmin,xmax,ymin,ymax,zmin,zmax
        #[arg(short, long)]
        bounds: String,
        /// Output file (default: model.xyz / model.pdb)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        sampling: SamplingArgs,
    },
    /// Display information about an STL mesh
    Info {
        /// Path to the STL file
        input: PathBuf,
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct SamplingArgs {
    /// Grid spacing (default 1.0 when --points is not given)
    #[arg(short, long)]
    interval: Option<f64>,
    /// Approximate total grid-point count; derives the spacing from the bounds
    #[arg(short = 'n', long, conflicts_with = "interval")]
    points: Option<usize>,
    /// Worker count (default: available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,
    /// Uniform scattering-length density for the cloud
    #[arg(long, default_value_t = 1.0)]
    sld: f64,
    /// Output format
    #[arg(short, long, value_enum, default_value = "xyz")]
    format: Format,
    /// Atom label written into coordinate records
    #[arg(long, default_value = "CA")]
    atom: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Line-oriented XYZ coordinate records
    Xyz,
    /// PDB-style ATOM records
    Pdb,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Xyz => "xyz",
            Format::Pdb => "pdb",
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Mesh {
            input,
            output,
            sampling,
            allow_open,
        } => run_mesh(&input, output, &sampling, allow_open),
        Commands::Predicate {
            expression,
            bounds,
            output,
            sampling,
        } => run_predicate(&expression, &bounds, output, &sampling),
        Commands::Info { input, json } => show_info(&input, json),
    }
}

fn build_settings(args: &SamplingArgs, bounds: &Aabb, check_closed: bool) -> Result<SampleSettings> {
    let interval = match (args.interval, args.points) {
        (Some(interval), _) => interval,
        (None, Some(points)) => sascloud_sample::interval_for_count(bounds, points)
            .context("cannot derive a grid spacing from --points")?,
        (None, None) => 1.0,
    };
    let mut settings = SampleSettings {
        interval,
        sld: args.sld,
        check_closed,
        ..Default::default()
    };
    if let Some(workers) = args.workers {
        settings.workers = workers;
    }
    Ok(settings)
}

fn run_mesh(
    input: &Path,
    output: Option<PathBuf>,
    sampling: &SamplingArgs,
    allow_open: bool,
) -> Result<()> {
    let mesh = TriMesh::from_stl_path(input)
        .with_context(|| format!("failed to load mesh from {}", input.display()))?;
    log::info!(
        "loaded {} triangles from {}",
        mesh.num_triangles(),
        input.display()
    );

    let settings = build_settings(sampling, &mesh.bounds, !allow_open)?;
    let cloud = sample_mesh(&mesh, &settings).context("sampling failed")?;

    let output = output.unwrap_or_else(|| default_output(input, sampling.format));
    write_cloud(&output, &cloud, sampling)?;
    println!(
        "{} points inside {} -> {}",
        cloud.len(),
        input.display(),
        output.display()
    );
    Ok(())
}

fn run_predicate(
    expression: &str,
    bounds: &str,
    output: Option<PathBuf>,
    sampling: &SamplingArgs,
) -> Result<()> {
    let predicate: Predicate = expression
        .parse()
        .with_context(|| format!("invalid predicate '{}'", expression))?;
    let bounds = parse_bounds(bounds)?;

    let settings = build_settings(sampling, &bounds, true)?;
    let cloud = sample_predicate(&predicate, &bounds, &settings).context("sampling failed")?;

    let output =
        output.unwrap_or_else(|| PathBuf::from(format!("model.{}", sampling.format.extension())));
    write_cloud(&output, &cloud, sampling)?;
    println!(
        "{} points inside '{}' -> {}",
        cloud.len(),
        expression,
        output.display()
    );
    Ok(())
}

fn parse_bounds(text: &str) -> Result<Aabb> {
    let parts: Vec<f64> = text
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("bounds '{}' must be six comma-separated numbers", text))?;
    if parts.len() != 6 {
        bail!(
            "bounds '{}' must have exactly six values, found {}",
            text,
            parts.len()
        );
    }
    Ok(Aabb::from_bounds(
        parts[0], parts[1], parts[2], parts[3], parts[4], parts[5],
    ))
}

fn default_output(input: &Path, format: Format) -> PathBuf {
    input.with_extension(format.extension())
}

fn write_cloud(path: &Path, cloud: &SampleCloud, sampling: &SamplingArgs) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    match sampling.format {
        Format::Xyz => sascloud_io::write_xyz(
            &mut writer,
            cloud,
            &sampling.atom,
            &format!("sld={}", cloud.sld_of(0)),
        )?,
        Format::Pdb => sascloud_io::write_pdb(&mut writer, cloud, &sampling.atom, 1.0, 20.0)?,
    }
    Ok(())
}

#[derive(Serialize)]
struct MeshInfo {
    triangles: usize,
    closed: bool,
    open_edges: usize,
    bounds_min: [f64; 3],
    bounds_max: [f64; 3],
}

fn show_info(input: &Path, json: bool) -> Result<()> {
    let mesh = TriMesh::from_stl_path(input)
        .with_context(|| format!("failed to load mesh from {}", input.display()))?;
    let open_edges = mesh.open_edge_count();
    let info = MeshInfo {
        triangles: mesh.num_triangles(),
        closed: open_edges == 0,
        open_edges,
        bounds_min: [mesh.bounds.min.x, mesh.bounds.min.y, mesh.bounds.min.z],
        bounds_max: [mesh.bounds.max.x, mesh.bounds.max.y, mesh.bounds.max.z],
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("triangles:  {}", info.triangles);
        println!(
            "bounds:     ({}, {}, {}) .. ({}, {}, {})",
            info.bounds_min[0],
            info.bounds_min[1],
            info.bounds_min[2],
            info.bounds_max[0],
            info.bounds_max[1],
            info.bounds_max[2]
        );
        println!(
            "closed:     {}{}",
            info.closed,
            if info.closed {
                String::new()
            } else {
                format!(" ({} open edges)", info.open_edges)
            }
        );
    }
    Ok(())
}
