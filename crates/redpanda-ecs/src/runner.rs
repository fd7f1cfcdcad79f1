use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::app::{App, Runner};
use crate::error::EcsError;
use crate::resource::keys;

/// The default runner: a single tick.
pub fn run_once(app: &mut App) -> Result<(), EcsError> {
    app.update()
}

/// Ticks the app until `sys.quit` is `true`, an optional frame limit is
/// reached, or a tick fails.
///
/// A missing `sys.quit` resource counts as `false`; one holding anything but
/// a `bool` is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopRunner {
    max_frames: Option<u64>,
    frame_rate: Option<u32>,
}

impl LoopRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after this many ticks.
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Sleep between ticks to hold roughly this many ticks per second.
    /// Zero disables pacing.
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = (fps > 0).then_some(fps);
        self
    }

    fn frame_budget(&self) -> Option<Duration> {
        self.frame_rate
            .map(|fps| Duration::from_nanos(1_000_000_000 / u64::from(fps)))
    }

    fn quit_requested(app: &App) -> Result<bool, EcsError> {
        if !app.resources().contains(keys::QUIT) {
            return Ok(false);
        }
        Ok(*app.resources().get::<bool>(keys::QUIT)?)
    }

    /// Run the loop. Returns the number of completed ticks.
    pub fn run(&self, app: &mut App) -> Result<u64, EcsError> {
        info!(
            "Loop runner started (max frames: {:?}, frame rate: {:?})",
            self.max_frames, self.frame_rate
        );
        let budget = self.frame_budget();
        let mut frames = 0u64;

        loop {
            if self.max_frames.is_some_and(|max| frames >= max) {
                info!("Frame limit reached after {} frames", frames);
                break;
            }
            if Self::quit_requested(app)? {
                info!("Quit requested after {} frames", frames);
                break;
            }

            let started = Instant::now();
            app.update()?;
            frames += 1;

            if let Some(budget) = budget {
                if let Some(remaining) = budget.checked_sub(started.elapsed()) {
                    thread::sleep(remaining);
                }
            }
        }
        Ok(frames)
    }

    /// Box this runner for [`AppBuilder::set_runner`](crate::AppBuilder::set_runner).
    pub fn into_runner(self) -> Runner {
        Box::new(move |app: &mut App| self.run(app).map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppBuilder;
    use crate::resource::Resources;
    use crate::system::SystemResult;
    use crate::world::World;

    fn count_and_quit_at(limit: u32) -> impl FnMut(&mut World, &mut Resources) -> SystemResult {
        move |_: &mut World, resources: &mut Resources| -> SystemResult {
            let counter = resources.get_mut::<u32>("counter")?;
            *counter += 1;
            if *counter >= limit {
                resources.insert(keys::QUIT, true);
            }
            Ok(())
        }
    }

    #[test]
    fn stops_when_quit_is_set() {
        let mut builder = AppBuilder::new();
        builder
            .add_resource("counter", 0u32)
            .add_resource(keys::QUIT, false)
            .add_system(count_and_quit_at(3))
            .unwrap();
        let mut app = builder.build();
        let frames = LoopRunner::new().run(&mut app).unwrap();
        assert_eq!(frames, 3);
        assert_eq!(*app.resources().get::<u32>("counter").unwrap(), 3);
    }

    #[test]
    fn stops_at_frame_limit_without_quit_flag() {
        let mut builder = AppBuilder::new();
        builder
            .add_resource("counter", 0u32)
            .add_system(count_and_quit_at(u32::MAX))
            .unwrap()
            .set_runner(LoopRunner::new().with_max_frames(7).into_runner());
        let mut app = builder.build();
        app.run().unwrap();
        assert_eq!(*app.resources().get::<u32>("counter").unwrap(), 7);
    }

    #[test]
    fn wrong_quit_type_is_an_error() {
        let mut builder = AppBuilder::new();
        builder.add_resource(keys::QUIT, "yes");
        let mut app = builder.build();
        assert!(matches!(
            LoopRunner::new().with_max_frames(1).run(&mut app),
            Err(EcsError::ResourceTypeMismatch { .. })
        ));
    }

    #[test]
    fn tick_errors_stop_the_loop() {
        let mut builder = AppBuilder::new();
        builder.add_system(count_and_quit_at(2)).unwrap();
        let mut app = builder.build();
        assert!(matches!(
            LoopRunner::new().with_max_frames(10).run(&mut app),
            Err(EcsError::SystemFailed { .. })
        ));
    }

    #[test]
    fn frame_pacing() {
        let runner = LoopRunner::new().with_frame_rate(100);
        assert_eq!(runner.frame_budget(), Some(Duration::from_millis(10)));
        assert_eq!(LoopRunner::new().with_frame_rate(0).frame_budget(), None);

        let mut app = AppBuilder::new().build();
        let started = Instant::now();
        assert_eq!(runner.with_max_frames(3).run(&mut app).unwrap(), 3);
        assert!(started.elapsed() >= Duration::from_millis(25));
    }
}
