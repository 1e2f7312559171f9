//! Casts random rays at a small room and places markers where they hit.
//!
//! Run with `RUST_LOG=debug` to see the engine's diagnostics.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use log::info;
use parking_lot::Mutex;
use worldcast_geometry::Vector3;
use worldcast_host::{HitMarkers, Host, RigCamera, SimulatedWorld, Surface};

const CONFIG: &str = r#"
debug = true

[options]
average_multiple_samples = true
retry_on_miss = true
ignore_vertical_tilt = false

[tuning]
min_distance = 1.0
max_distance = 50.0
"#;

const FRAME: Duration = Duration::from_millis(16);
const FRAMES: u32 = 600;
const TOGGLE_EVERY: u32 = 120;

fn main() -> Result<()> {
    env_logger::init();

    let world = SimulatedWorld::new()
        .with_surface(Surface::floor(-1.5))
        .with_surface(Surface::disc((0.0, 0.0, -8.0), Vector3::Z, 6.0))
        .with_surface(Surface::disc((-6.0, 0.0, 0.0), Vector3::X, 6.0))
        .with_surface(Surface::disc((6.0, 0.0, 0.0), Vector3::NEG_X, 6.0));
    let camera = RigCamera::looking_at(Vector3::ZERO, (0.0, -0.3, -1.0));

    let host = Host::new(world, camera)?.with_diagnostics_sink(|line: &str| info!("{line}"));
    let engine = host.engine_from_toml(CONFIG)?;

    let markers = Arc::new(Mutex::new(HitMarkers::new()));
    let m = markers.clone();
    engine
        .cast_random(move |result| {
            if let Some(result) = result {
                m.lock().place(&result);
            }
        })
        .loop_every(Duration::ZERO);

    let mut now = Instant::now();
    for frame in 1..=FRAMES {
        now += FRAME;
        host.frame(now);

        if frame % TOGGLE_EVERY == 0 {
            let mode = engine.mode().toggled();
            info!("Frame {frame}: switching to {mode:?}");
            engine.set_mode(mode);
            host.camera().turn(0.5);
        }
    }

    engine.stop();

    let markers = markers.lock();
    let on_floor = markers.iter().filter(|m| m.translate.y < -1.0).count();
    info!("Placed {} markers, {on_floor} on the floor", markers.len());
    if let Some(latest) = markers.latest() {
        info!(
            "Latest marker at {} facing {}",
            latest.translate,
            latest.transform_vector(Vector3::Z)
        );
    }
    Ok(())
}
