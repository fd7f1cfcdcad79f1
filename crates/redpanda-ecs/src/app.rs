use std::fmt;

use tracing::{error, info};

use crate::area::Area;
use crate::error::EcsError;
use crate::plugin::Plugin;
use crate::resource::{keys, Resources};
use crate::runner;
use crate::schedule::Schedule;
use crate::stage::{DEFAULT_STAGES, STARTUP, STARTUP_STAGES, UPDATE};
use crate::system::System;
use crate::teardown::{Teardown, TeardownGuard};
use crate::world::World;

/// Drives an [`App`]; called once by [`App::run`].
pub type Runner = Box<dyn FnMut(&mut App) -> Result<(), EcsError>>;

/// The running application: world, resources, the main and startup
/// schedules, a runner and the teardown list.
pub struct App {
    world: World,
    resources: Resources,
    schedule: Schedule,
    startup_schedule: Schedule,
    runner: Runner,
    teardown: Teardown,
    started: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// An app with no stages and the single-shot runner.
    pub fn new() -> Self {
        Self::with_teardown(Teardown::new())
    }

    fn with_teardown(teardown: Teardown) -> Self {
        let mut resources = Resources::new();
        resources.insert(keys::TEARDOWN, teardown.clone());
        Self {
            world: World::new(),
            resources,
            schedule: Schedule::new(),
            startup_schedule: Schedule::named("Startup"),
            runner: Box::new(runner::run_once),
            teardown,
            started: false,
        }
    }

    /// Run the startup schedule. Only the first successful call does work.
    pub fn initialize(&mut self) -> Result<(), EcsError> {
        if self.started {
            return Ok(());
        }
        info!("Initializing app");
        self.startup_schedule
            .initialize_and_run(&mut self.world, &mut self.resources)?;
        self.started = true;
        Ok(())
    }

    /// One tick of the main schedule.
    pub fn update(&mut self) -> Result<(), EcsError> {
        self.schedule
            .initialize_and_run(&mut self.world, &mut self.resources)
    }

    /// Hand the app to its runner.
    pub fn run(&mut self) -> Result<(), EcsError> {
        let mut runner = std::mem::replace(&mut self.runner, Box::new(runner::run_once));
        let result = runner(self);
        self.runner = runner;
        result
    }

    /// Initialize, run, then drain the teardown list. The list is drained
    /// whether the run succeeds, fails or panics.
    pub fn launch(mut self) -> Result<(), EcsError> {
        let _guard = TeardownGuard(self.teardown.clone());
        let result = self.initialize().and_then(|()| self.run());
        if let Err(e) = &result {
            error!("App stopped with an error: {}", e);
            if let Some(source) = std::error::Error::source(e) {
                error!("Caused by: {:#}", source);
            }
        }
        result
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    pub fn startup_schedule(&self) -> &Schedule {
        &self.startup_schedule
    }

    pub fn startup_schedule_mut(&mut self) -> &mut Schedule {
        &mut self.startup_schedule
    }

    pub fn teardown(&self) -> &Teardown {
        &self.teardown
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("world", &self.world)
            .field("resources", &self.resources)
            .field("schedule", &self.schedule)
            .field("startup_schedule", &self.startup_schedule)
            .field("teardown", &self.teardown)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "App")?;
        write!(f, "{}", self.world)?;
        write!(f, "{}", self.resources)?;
        write!(f, "{}", self.startup_schedule)?;
        write!(f, "{}", self.schedule)
    }
}

/// Fluent construction of an [`App`].
///
/// ```ignore
/// let mut builder = AppBuilder::new();
/// builder
///     .add_plugin(CorePlugin::default())?
///     .add_system(move_walkers)?
///     .set_runner(LoopRunner::new().with_max_frames(600).into_runner());
/// builder.run()?;
/// ```
pub struct AppBuilder {
    app: App,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppBuilder {
    /// A builder over an app with the three startup stages and the seven
    /// main stages.
    pub fn new() -> Self {
        Self::with_default_stages(Teardown::new())
    }

    fn with_default_stages(teardown: Teardown) -> Self {
        let mut app = App::with_teardown(teardown);
        app.startup_schedule = Schedule::named("Startup").with_stages(&STARTUP_STAGES);
        app.schedule = Schedule::new().with_stages(&DEFAULT_STAGES);
        Self { app }
    }

    /// A builder over an app with no stages at all.
    pub fn empty() -> Self {
        Self { app: App::new() }
    }

    /// Throw away everything configured so far and start from the default
    /// stages. Registered teardown callbacks are kept.
    pub fn clear(&mut self) -> &mut Self {
        let teardown = self.app.teardown.clone();
        *self = Self::with_default_stages(teardown);
        self
    }

    // ---- World and resources ----

    pub fn set_world(&mut self, world: World) -> &mut Self {
        self.app.world = world;
        self
    }

    pub fn add_area(&mut self, area: Area) -> &mut Self {
        self.app.world.add_area(area);
        self
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.app.world
    }

    pub fn add_resource<T: 'static + Send + Sync>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> &mut Self {
        self.app.resources.insert(key, value);
        self
    }

    pub fn resources(&self) -> &Resources {
        &self.app.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.app.resources
    }

    pub fn teardown(&self) -> &Teardown {
        &self.app.teardown
    }

    // ---- Stages ----

    pub fn add_stage(&mut self, name: &str) -> Result<&mut Self, EcsError> {
        self.app.schedule.add_stage(name)?;
        Ok(self)
    }

    pub fn add_stage_before(&mut self, name: &str, target: &str) -> Result<&mut Self, EcsError> {
        self.app.schedule.add_stage_before(name, target)?;
        Ok(self)
    }

    pub fn add_stage_after(&mut self, name: &str, target: &str) -> Result<&mut Self, EcsError> {
        self.app.schedule.add_stage_after(name, target)?;
        Ok(self)
    }

    pub fn add_startup_stage(&mut self, name: &str) -> Result<&mut Self, EcsError> {
        self.app.startup_schedule.add_stage(name)?;
        Ok(self)
    }

    pub fn add_startup_stage_before(
        &mut self,
        name: &str,
        target: &str,
    ) -> Result<&mut Self, EcsError> {
        self.app.startup_schedule.add_stage_before(name, target)?;
        Ok(self)
    }

    pub fn add_startup_stage_after(
        &mut self,
        name: &str,
        target: &str,
    ) -> Result<&mut Self, EcsError> {
        self.app.startup_schedule.add_stage_after(name, target)?;
        Ok(self)
    }

    // ---- Systems ----

    /// Add a system to the `update` stage.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> Result<&mut Self, EcsError> {
        self.add_system_to_stage(UPDATE, system)
    }

    pub fn add_system_to_stage<S: System + 'static>(
        &mut self,
        stage: &str,
        system: S,
    ) -> Result<&mut Self, EcsError> {
        self.app.schedule.add_system_to_stage(stage, Box::new(system))?;
        Ok(self)
    }

    pub fn add_system_to_stage_front<S: System + 'static>(
        &mut self,
        stage: &str,
        system: S,
    ) -> Result<&mut Self, EcsError> {
        self.app
            .schedule
            .add_system_to_stage_front(stage, Box::new(system))?;
        Ok(self)
    }

    /// Add a system to the `startup` stage of the startup schedule.
    pub fn add_startup_system<S: System + 'static>(
        &mut self,
        system: S,
    ) -> Result<&mut Self, EcsError> {
        self.add_startup_system_to_stage(STARTUP, system)
    }

    pub fn add_startup_system_to_stage<S: System + 'static>(
        &mut self,
        stage: &str,
        system: S,
    ) -> Result<&mut Self, EcsError> {
        self.app
            .startup_schedule
            .add_system_to_stage(stage, Box::new(system))?;
        Ok(self)
    }

    /// Build a system from the current resources, then add it to `update`.
    pub fn init_system<S, F>(&mut self, init: F) -> Result<&mut Self, EcsError>
    where
        S: System + 'static,
        F: FnOnce(&mut Resources) -> Result<S, EcsError>,
    {
        self.init_system_to_stage(UPDATE, init)
    }

    pub fn init_system_to_stage<S, F>(&mut self, stage: &str, init: F) -> Result<&mut Self, EcsError>
    where
        S: System + 'static,
        F: FnOnce(&mut Resources) -> Result<S, EcsError>,
    {
        // Check the stage first so a bad name doesn't run `init`.
        self.app.schedule.stage(stage)?;
        let system = init(&mut self.app.resources)?;
        self.add_system_to_stage(stage, system)
    }

    pub fn init_startup_system<S, F>(&mut self, init: F) -> Result<&mut Self, EcsError>
    where
        S: System + 'static,
        F: FnOnce(&mut Resources) -> Result<S, EcsError>,
    {
        self.init_startup_system_to_stage(STARTUP, init)
    }

    pub fn init_startup_system_to_stage<S, F>(
        &mut self,
        stage: &str,
        init: F,
    ) -> Result<&mut Self, EcsError>
    where
        S: System + 'static,
        F: FnOnce(&mut Resources) -> Result<S, EcsError>,
    {
        self.app.startup_schedule.stage(stage)?;
        let system = init(&mut self.app.resources)?;
        self.add_startup_system_to_stage(stage, system)
    }

    // ---- Runner and plugins ----

    pub fn set_runner(
        &mut self,
        runner: impl FnMut(&mut App) -> Result<(), EcsError> + 'static,
    ) -> &mut Self {
        self.app.runner = Box::new(runner);
        self
    }

    /// Let a plugin configure this builder, right away.
    pub fn add_plugin(&mut self, plugin: impl Plugin) -> Result<&mut Self, EcsError> {
        info!("Adding plugin '{}'", plugin.name());
        plugin.build(self)?;
        Ok(self)
    }

    /// Finish building.
    pub fn build(self) -> App {
        self.app
    }

    /// Build the app and [`launch`](App::launch) it.
    pub fn run(self) -> Result<(), EcsError> {
        self.build().launch()
    }
}

impl fmt::Display for AppBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AppBuilder\n{}", self.app)
    }
}
