use anyhow::{Context, Result};
use bike_viewer::cli::Cli;
use bike_viewer::loaders::FileSource;
use bike_viewer::types::ShapeInstance;
use bike_viewer::{FrameIterator, Viewer, ViewerConfig};
use clap::Parser;
use futures::executor::ThreadPool;
use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

fn load_config(cli: &Cli) -> Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::from_json_file(path)?,
        None => ViewerConfig::default(),
    };

    if let Some(kind) = cli.kind {
        config.kind = kind;
    }
    if let Some(url) = &cli.asset_url {
        config.asset_url = Some(url.clone());
    }
    if let Some(seed) = cli.seed {
        config.particle_seed = Some(seed);
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let pool = ThreadPool::new().context("Failed to start loader thread pool")?;

    let mut viewer = Viewer::new(config, Arc::new(FileSource), pool)
        .with_callback(|kind| println!("Selected {} bike", kind));

    println!(
        "Bike Viewer - {} bike, {} frames at {} fps",
        viewer.kind(),
        cli.frames,
        cli.fps
    );

    let mut last: Vec<ShapeInstance> = Vec::new();
    for frame in FrameIterator::fixed(cli.fps).take(cli.frames as usize) {
        for event in cli.events_at(frame.number) {
            viewer.handle_pointer(event);
        }

        let view = viewer.on_frame(frame);
        if frame.number + 1 == cli.frames {
            last = view.instances();
        }
        // Give the loader pool real time to make progress between frames
        std::thread::sleep(frame.delta);
    }

    log::info!(
        "Finished in state {} / {:?}",
        viewer.load_state().name(),
        viewer.interaction_state()
    );

    if let Some(path) = &cli.dump {
        let file = File::create(path).context(format!("Failed to create {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &last)
            .context("Failed to write shape instances")?;
        println!("Wrote {} shape instances to {:?}", last.len(), path);
    }

    Ok(())
}
