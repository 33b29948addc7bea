// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Corefine CLI

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use ::corefine::geometry::{analytics, boolean_operation, corefine, BooleanOp};
use ::corefine::io::{read_mesh, write_mesh};
use ::corefine::Mesh;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "corefine")]
#[command(about = "Exact boolean operations on closed triangle meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OpArg {
    Union,
    Intersection,
    Difference,
}

impl From<OpArg> for BooleanOp {
    fn from(op: OpArg) -> Self {
        match op {
            OpArg::Union => BooleanOp::Union,
            OpArg::Intersection => BooleanOp::Intersection,
            OpArg::Difference => BooleanOp::Difference,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a boolean operation between two closed meshes
    Boolean {
        /// Operation to perform
        #[arg(value_enum)]
        op: OpArg,

        /// First input mesh (off, obj, or stl)
        mesh_a: PathBuf,

        /// Second input mesh
        mesh_b: PathBuf,

        /// Output mesh file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Corefine two meshes and write both refined results
    Corefine {
        /// First input mesh
        mesh_a: PathBuf,

        /// Second input mesh
        mesh_b: PathBuf,

        /// Output file for the refined first mesh
        #[arg(short = 'a', long = "out-a")]
        out_a: PathBuf,

        /// Output file for the refined second mesh
        #[arg(short = 'b', long = "out-b")]
        out_b: PathBuf,
    },

    /// Validate a mesh and print its statistics
    Check {
        /// Input mesh
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Boolean {
            op,
            mesh_a,
            mesh_b,
            output,
        } => boolean_command(*op, mesh_a, mesh_b, output, cli.verbose),
        Commands::Corefine {
            mesh_a,
            mesh_b,
            out_a,
            out_b,
        } => corefine_command(mesh_a, mesh_b, out_a, out_b, cli.verbose),
        Commands::Check { input, json } => check_command(input, *json),
        Commands::Version => {
            println!("corefine v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load(path: &Path, verbose: bool) -> Result<Mesh> {
    let mesh = read_mesh(path)?;
    if verbose {
        println!(
            "Loaded {}: {} vertices, {} faces",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
    }
    Ok(mesh)
}

fn boolean_command(
    op: OpArg,
    path_a: &Path,
    path_b: &Path,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    let a = load(path_a, verbose)?;
    let b = load(path_b, verbose)?;
    let op: BooleanOp = op.into();

    let start = std::time::Instant::now();
    let result = boolean_operation(&a, &b, op)?;
    let elapsed = start.elapsed();

    write_mesh(output, &result)?;

    if verbose {
        println!("Computed in {elapsed:.2?}");
        println!(
            "Result: {} vertices, {} faces",
            result.vertex_count(),
            result.face_count()
        );
        if result.is_empty() {
            println!("{}", "Result is the empty solid".yellow());
        }
    }
    println!(
        "{} {} of {} and {} -> {}",
        "Computed".green(),
        op,
        path_a.display(),
        path_b.display(),
        output.display()
    );
    Ok(())
}

fn corefine_command(
    path_a: &Path,
    path_b: &Path,
    out_a: &Path,
    out_b: &Path,
    verbose: bool,
) -> Result<()> {
    let a = load(path_a, verbose)?;
    let b = load(path_b, verbose)?;

    let start = std::time::Instant::now();
    let refined = corefine(&a, &b)?;
    let elapsed = start.elapsed();

    write_mesh(out_a, &refined.mesh_a)?;
    write_mesh(out_b, &refined.mesh_b)?;

    if verbose {
        println!("Corefined in {elapsed:.2?}");
        println!(
            "First mesh: {} -> {} faces, {} intersection edges",
            a.face_count(),
            refined.mesh_a.face_count(),
            refined.shared_edges_a.len()
        );
        println!(
            "Second mesh: {} -> {} faces, {} intersection edges",
            b.face_count(),
            refined.mesh_b.face_count(),
            refined.shared_edges_b.len()
        );
    }
    println!(
        "{} {} and {} -> {}, {}",
        "Corefined".green(),
        path_a.display(),
        path_b.display(),
        out_a.display(),
        out_b.display()
    );
    Ok(())
}

fn check_command(input: &Path, json: bool) -> Result<()> {
    let mesh = read_mesh(input)?;
    let stats = analytics::analyze(&mesh);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", input.display().to_string().bold());
    println!("  Vertices:      {}", stats.vertex_count);
    println!("  Faces:         {}", stats.face_count);
    println!("  Volume:        {:.6}", stats.volume);
    println!("  Surface area:  {:.6}", stats.surface_area);
    println!(
        "  Bounding box:  ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
        stats.bbox[0], stats.bbox[1], stats.bbox[2], stats.bbox[3], stats.bbox[4], stats.bbox[5]
    );
    if stats.is_watertight {
        println!("  Watertight:    {}", "yes".green());
    } else {
        println!("  Watertight:    {}", "no".red());
        std::process::exit(1);
    }
    Ok(())
}
