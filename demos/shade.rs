//! Shadow casting demo.
//!
//! ```text
//! cargo run --example shade                              # vegetation on a tracker row
//! cargo run --example shade --features stl -- scene.stl  # every solid of an STL scene on the ground
//! ```
//!
//! Set `RUST_LOG=shadecast=debug` to see per-triangle decisions.

use shadecast::geometry::PlanarSurface;
use shadecast::math::{Point3, Vector3};
use shadecast::observer::TracingObserver;
use shadecast::{Result, ShadowCaster};

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for the demo and the engine.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("shade=info".parse().unwrap_or_default())
        .add_directive("shadecast=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match std::env::args().nth(1) {
        Some(path) => shade_scene(&path),
        None => shade_panel(),
    }
}

fn shade_panel() -> Result<()> {
    let tracker = PlanarSurface::from_coords(&[
        [-0.9985, -2.40055, 1.729_452_73],
        [-0.9985, 2.40055, 1.729_452_73],
        [-1.0045, -2.39935, 1.739_845_04],
        [-1.0045, 2.39935, 1.739_845_04],
        [1.0045, -2.39935, -1.739_845_04],
        [1.0045, 2.39935, -1.739_845_04],
        [0.9985, -2.40055, -1.729_452_73],
        [0.9985, 2.40055, -1.729_452_73],
    ])?;
    let vegetation = [
        Point3::new(1.0046, -2.315, -1.739_845_04),
        Point3::new(1.0046, -2.315, -1.439_845_04),
        Point3::new(1.0046, -2.285, -1.439_845_04),
        Point3::new(1.0046, -2.285, -1.739_845_04),
    ];
    let sun = Vector3::new(0.858_870_74, 0.142_553_08, 0.491_954_94);

    let caster = ShadowCaster::new().with_observer(TracingObserver);
    let shadows = caster.shade_polygon(&vegetation, &tracker, sun)?;
    if shadows.is_empty() {
        println!("No shadow cast");
    }
    for shadow in &shadows {
        println!("shaded area on tracker: {:.6}", shadow.covered_area(&tracker));
    }
    Ok(())
}

#[cfg(feature = "stl")]
fn shade_scene(path: &str) -> Result<()> {
    use shadecast::io::StlSource;
    use shadecast::shadow::CasterParams;

    let ground = PlanarSurface::from_coords(&[
        [-1e3, -1e3, 0.0],
        [1e3, -1e3, 0.0],
        [1e3, 1e3, 0.0],
        [-1e3, 1e3, 0.0],
    ])?;
    let caster = ShadowCaster::from_source(&StlSource::new(path), CasterParams::default())?
        .with_observer(TracingObserver);
    let shadows = caster.shade_mesh(&ground, Vector3::new(0.3, 0.2, 0.9))?;
    for (i, shadow) in shadows.iter().enumerate() {
        println!("solid shadow {i}: area {:.4}", shadow.area());
    }
    Ok(())
}

#[cfg(not(feature = "stl"))]
fn shade_scene(path: &str) -> Result<()> {
    eprintln!("cannot read {path}: rebuild with --features stl");
    Ok(())
}
