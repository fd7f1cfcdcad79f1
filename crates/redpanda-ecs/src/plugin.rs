use std::time::Instant;

use redpanda_core::{GameTime, TimeConfig, TimerRegistry};
use tracing::info;

use crate::app::AppBuilder;
use crate::error::EcsError;
use crate::resource::{keys, Resources};
use crate::stage::{PRE_EVENT, PRE_STARTUP};
use crate::system::{short_system_name, System, SystemResult};
use crate::world::World;

/// A reusable bundle of stages, systems and resources.
///
/// `build` runs immediately when the plugin is added, against the same
/// builder the caller is using.
pub trait Plugin {
    fn name(&self) -> &str {
        short_system_name(std::any::type_name::<Self>())
    }

    fn build(&self, app: &mut AppBuilder) -> Result<(), EcsError>;
}

impl<F> Plugin for F
where
    F: Fn(&mut AppBuilder) -> Result<(), EcsError>,
{
    fn build(&self, app: &mut AppBuilder) -> Result<(), EcsError> {
        (self)(app)
    }
}

/// Number of controller resources published at startup.
pub const CONTROLLERS: usize = 4;

/// Directional input state for one player, filled in by an input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controller {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Output size in pixels, published as `sys.resolution`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Clock, timers, quit flag and controllers.
///
/// Startup publishes `sys.clock`, `sys.timers`, `sys.quit`,
/// `game.time_elapsed` and one `Controller` per player. Each tick the
/// `pre_event` stage advances the clock and then the timers.
#[derive(Debug, Clone, Default)]
pub struct CorePlugin {
    pub time: TimeConfig,
}

impl CorePlugin {
    pub fn new(time: TimeConfig) -> Self {
        Self { time }
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut AppBuilder) -> Result<(), EcsError> {
        app.add_startup_system_to_stage(PRE_STARTUP, CoreSetup {
            time: self.time.clone(),
        })?
        .add_system_to_stage_front(PRE_EVENT, TickTimers)?
        .add_system_to_stage_front(PRE_EVENT, AdvanceClock::default())?;
        Ok(())
    }
}

struct CoreSetup {
    time: TimeConfig,
}

impl System for CoreSetup {
    fn name(&self) -> &str {
        "core_setup"
    }

    fn initialize(&mut self, _world: &mut World, resources: &mut Resources) -> SystemResult {
        resources.insert(keys::QUIT, false);
        resources.insert(keys::CLOCK, GameTime::new(self.time.clone()));
        resources.insert(keys::TIMERS, TimerRegistry::new());
        resources.insert(keys::TIME_ELAPSED, 0.0f32);
        for index in 1..=CONTROLLERS {
            resources.insert(keys::controller(index), Controller::default());
        }
        info!(
            "Core resources ready (time scale {}, max delta {}s)",
            self.time.time_scale, self.time.max_delta_time
        );
        Ok(())
    }
}

/// Measures the real time since the previous tick, feeds it to the clock
/// and publishes the scaled delta as `game.time_elapsed`.
#[derive(Debug, Default)]
pub struct AdvanceClock {
    last_tick: Option<Instant>,
}

impl System for AdvanceClock {
    fn name(&self) -> &str {
        "advance_clock"
    }

    fn initialize(&mut self, _world: &mut World, _resources: &mut Resources) -> SystemResult {
        self.last_tick = Some(Instant::now());
        Ok(())
    }

    fn run_once(&mut self, _world: &mut World, resources: &mut Resources) -> SystemResult {
        let now = Instant::now();
        let raw = self
            .last_tick
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_tick = Some(now);

        let clock = resources.get_mut::<GameTime>(keys::CLOCK)?;
        clock.update(raw);
        let elapsed = clock.delta_time;
        *resources.get_mut::<f32>(keys::TIME_ELAPSED)? = elapsed;
        Ok(())
    }
}

/// Advances every registered timer by `game.time_elapsed`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickTimers;

impl System for TickTimers {
    fn name(&self) -> &str {
        "tick_timers"
    }

    fn run_once(&mut self, _world: &mut World, resources: &mut Resources) -> SystemResult {
        let elapsed = *resources.get::<f32>(keys::TIME_ELAPSED)?;
        resources
            .get_mut::<TimerRegistry>(keys::TIMERS)?
            .tick(elapsed);
        Ok(())
    }
}
