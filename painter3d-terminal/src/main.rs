/// Painter3D terminal viewer
///
/// Walks a camera through a flat-shaded scene drawn with ASCII characters.
/// Controls:
///   - W/S: Move along the look direction
///   - A/D or Left/Right: Turn
///   - Up/Down: Climb and descend
///   - R/F: Look up and down
///   - Q/ESC: Quit
use std::path::PathBuf;

use anyhow::Context;
use painter3d_core::{obj, Mesh, Vec3};
use painter3d_terminal::{AppConfig, TerminalApp};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    obj: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                args.config = Some(it.next().context("--config requires a path")?.into());
            }
            "--obj" => {
                args.obj = Some(it.next().context("--obj requires a path")?.into());
            }
            "--help" | "-h" => {
                println!("usage: painter3d-terminal [--config FILE] [--obj FILE]");
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

/// Scene used when no model is given: a cube ahead of the camera with a
/// floor slab and a pillar off to the side.
fn default_scene() -> Vec<Mesh> {
    vec![
        Mesh::centered_box(Vec3::new(0.0, 0.0, 6.0), 2.0, 2.0, 2.0),
        Mesh::centered_box(Vec3::new(0.0, -2.0, 8.0), 12.0, 0.5, 12.0),
        Mesh::centered_box(Vec3::new(-4.0, 1.0, 10.0), 1.0, 6.0, 1.0),
    ]
}

fn main() -> anyhow::Result<()> {
    // Raw mode owns stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let meshes = match &args.obj {
        Some(path) => {
            let mut mesh = obj::load_obj(path)
                .with_context(|| format!("failed to load model {}", path.display()))?;
            if let Some(scale) = config.mesh_scale {
                mesh.scale(scale);
            }
            // Place the model in front of the camera
            mesh.translate(Vec3::new(0.0, 0.0, 8.0));
            vec![mesh]
        }
        None => default_scene(),
    };
    info!(
        triangles = meshes.iter().map(Mesh::len).sum::<usize>(),
        "scene ready"
    );

    let mut app = TerminalApp::new(meshes, config)?;
    app.run()
}
