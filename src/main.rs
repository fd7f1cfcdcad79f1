//! Redpanda - an ECS runtime for small 2D games
//!
//! This binary loads the settings, wires the core plugin and the meadow demo
//! together and runs them in a paced loop.

mod demo;
mod settings;

use anyhow::{Context, Result};
use redpanda_ecs::{keys, AppBuilder, CorePlugin, EcsError, LoopRunner, Plugin, Resolution};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use settings::GameSettings;

/// Publishes the title and window resolution from the settings.
struct ConfigPlugin {
    title: String,
    resolution: Resolution,
}

impl ConfigPlugin {
    fn new(settings: &GameSettings) -> Self {
        Self {
            title: settings.title.clone(),
            resolution: Resolution {
                width: settings.window.width,
                height: settings.window.height,
            },
        }
    }
}

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut AppBuilder) -> Result<(), EcsError> {
        app.add_resource(keys::TITLE, self.title.clone())
            .add_resource(keys::RESOLUTION, self.resolution);
        Ok(())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Redpanda...");

    let settings = GameSettings::load();
    info!(
        "{} at {}x{}, {} fps",
        settings.title, settings.window.width, settings.window.height, settings.frame_rate
    );

    let mut runner = LoopRunner::new().with_frame_rate(settings.frame_rate);
    if let Some(max_frames) = settings.max_frames {
        runner = runner.with_max_frames(max_frames);
    }

    let mut builder = AppBuilder::new();
    builder
        .add_plugin(ConfigPlugin::new(&settings))?
        .add_plugin(CorePlugin::new(settings.time.clone()))?
        .add_plugin(demo::MeadowPlugin)?
        .set_runner(runner.into_runner());

    builder.run().context("Game loop failed")?;
    info!("Shutdown complete");
    Ok(())
}
