//! Tessel CLI - polygon mesh triangulation tool.
//!
//! Usage: tessel <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `tessel --help` for available commands. Set `RUST_LOG=warn` to see
//! each face that fails to triangulate.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use tessel::algo::assemble::{assemble_with_progress, AssembleOptions, AxisConvention};
use tessel::algo::plane::fit_plane;
use tessel::algo::triangulate::{TriangulationMode, DEFAULT_MAX_ITERATIONS};
use tessel::algo::Progress;
use tessel::io;
use tessel::mesh::HalfEdgeMesh;

#[derive(Parser)]
#[command(name = "tessel")]
#[command(author, version, about = "Polygon mesh triangulation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Triangulate a polygon mesh into per-material triangle lists
    Triangulate {
        /// Input mesh file (.json or .ply)
        input: PathBuf,

        /// Output mesh file (.obj, .ply or .json)
        output: PathBuf,

        /// Uniform scale applied to output positions
        #[arg(short, long, default_value = "1.0")]
        scale: f64,

        /// Convert Z-up source coordinates to Y-up
        #[arg(long)]
        source_axes: bool,

        /// Fan-triangulate instead of ear clipping (convex faces only)
        #[arg(long)]
        fan: bool,

        /// Ear-clipping iteration budget per face
        #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
        max_iterations: usize,

        /// Share vertices between identical corners
        #[arg(long)]
        weld: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,

        /// Write failed faces to this JSON file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Display polygon mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Re-encode a polygon mesh in another format
    Convert {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Triangulate {
            input,
            output,
            scale,
            source_axes,
            fan,
            max_iterations,
            weld,
            sequential,
            report,
        } => {
            let options = AssembleOptions::default()
                .with_scale(scale)
                .with_axes(if source_axes {
                    AxisConvention::SourceToYUp
                } else {
                    AxisConvention::Identity
                })
                .with_mode(if fan {
                    TriangulationMode::Fan
                } else {
                    TriangulationMode::EarClip
                })
                .with_max_iterations(max_iterations)
                .with_welding(weld)
                .with_parallel(!sequential);
            cmd_triangulate(&input, &output, &options, report.as_ref())?;
        }

        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Convert { input, output } => {
            cmd_convert(&input, &output)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Workers report out of order; only ever move forward.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            raw_percent,
            message
        );
        let _ = std::io::stderr().flush();

        if raw_percent == 100 {
            eprintln!();
        }
    })
}

fn cmd_triangulate(
    input: &PathBuf,
    output: &PathBuf,
    options: &AssembleOptions,
    report: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;

    println!(
        "Loaded: {} vertices, {} faces, {} materials",
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_materials()
    );

    let mode = if options.parallel { "parallel" } else { "sequential" };
    println!("Triangulating ({:?}, {})...", options.mode, mode);

    let progress = create_progress();
    let start = Instant::now();
    let out = assemble_with_progress(&mesh, options, &progress)?;
    let elapsed = start.elapsed();

    io::save(&out, output)?;
    println!(
        "Saved: {} ({} vertices, {} triangles, {:.2?})",
        output.display(),
        out.num_vertices(),
        out.num_triangles(),
        elapsed
    );

    for submesh in out.submeshes.iter().filter(|s| !s.triangles.is_empty()) {
        println!("  {}: {} triangles", submesh.material, submesh.triangles.len());
    }

    if !out.failures.is_empty() {
        println!("Failed faces: {}", out.failures.len());
    }
    if let Some(path) = report {
        io::write_failure_report(&out.failures, path)?;
        println!("Report: {}", path.display());
    }

    Ok(())
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());
    println!("Corners: {}", mesh.num_corners());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    let mut min_size = usize::MAX;
    let mut max_size = 0;
    let mut malformed = 0;
    let mut max_deviation = 0.0_f64;
    let mut faces_per_material = vec![0usize; mesh.num_materials()];

    for f in mesh.face_ids() {
        let size = mesh.face_size(f);
        min_size = min_size.min(size);
        max_size = max_size.max(size);
        if let Some(count) = faces_per_material.get_mut(mesh.face_material(f).index()) {
            *count += 1;
        }

        match mesh.face_positions(f) {
            Ok(points) => {
                max_deviation = max_deviation.max(fit_plane(&points).rms_deviation(&points));
            }
            Err(_) => malformed += 1,
        }
    }

    if mesh.num_faces() > 0 {
        println!("Face sizes: [{}, {}]", min_size, max_size);
    }
    println!("Largest off-plane deviation (RMS): {:.6}", max_deviation);
    println!("Malformed faces: {}", malformed);

    let boundary = mesh.num_boundary_halfedges();
    if boundary == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary half-edges)", boundary);
    }

    println!(
        "Attributes: texcoords={}, normals={}",
        mesh.has_texcoords(),
        mesh.has_normals()
    );

    println!("Materials:");
    for (name, count) in mesh.materials().iter().zip(&faces_per_material) {
        println!("  {}: {} faces", name, count);
    }

    Ok(())
}

fn cmd_convert(input: &PathBuf, output: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;
    io::save_mesh(&mesh, output)?;
    println!(
        "Converted: {} -> {} ({} faces)",
        input.display(),
        output.display(),
        mesh.num_faces()
    );
    Ok(())
}
