//! Example: loading assets off a fixed-rate control loop
//!
//! Run with `RUST_LOG=kairos=debug cargo run --example asset_loading` to
//! see the pool lifecycle.

use kairos::tools::{self, timeout};
use kairos::{PoolBuilder, PromiseError};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn load(name: &'static str, cost_ms: u64) -> Result<Vec<u8>, PromiseError> {
    thread::sleep(Duration::from_millis(cost_ms));

    if name.ends_with(".bad") {
        return Err(PromiseError::msg(format!("{name}: unsupported format")));
    }

    Ok(name.bytes().collect())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pool = PoolBuilder::new()
        .worker_threads(4)
        .thread_name("loader")
        .build()
        .expect("failed to start the loader pool");

    let handle = pool.handle();

    let textures: Vec<_> = [("grass.png", 40), ("stone.png", 70), ("water.png", 20)]
        .into_iter()
        .map(|(name, cost)| pool.try_spawn(move || load(name, cost)))
        .collect();

    let level = tools::all(textures).map(|blobs| blobs.iter().map(Vec::len).sum::<usize>());
    let level = timeout(&handle, Duration::from_secs(1), level);

    let music = tools::retry(3, {
        let handle = handle.clone();
        move || handle.try_spawn(|| load("theme.bad", 10))
    })
    .map(|blob| blob.len())
    .catch_error(|error| {
        tracing::warn!(%error, "music unavailable, continuing without it");
        Ok(0)
    });

    // The control loop keeps ticking while the pool works.
    let mut frames = 0u32;
    while !pool.is_idle() {
        frames += 1;
        thread::sleep(Duration::from_millis(16));
    }

    tracing::info!(frames, "background loading finished");

    match level.wait() {
        Ok(bytes) => tracing::info!(bytes, "level textures loaded"),
        Err(error) => tracing::error!(%error, "level failed to load"),
    }

    tracing::info!(bytes = music.wait().unwrap_or(0), "music loaded");
}
