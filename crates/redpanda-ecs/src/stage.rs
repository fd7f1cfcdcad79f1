use std::fmt;

use crate::error::EcsError;
use crate::executor::{system_failed, Executor, SequentialExecutor};
use crate::resource::Resources;
use crate::system::{Hook, System};
use crate::world::World;

pub const PRE_STARTUP: &str = "pre_startup";
pub const STARTUP: &str = "startup";
pub const POST_STARTUP: &str = "post_startup";

pub const FIRST: &str = "first";
pub const PRE_EVENT: &str = "pre_event";
pub const EVENT: &str = "event";
pub const PRE_UPDATE: &str = "pre_update";
pub const UPDATE: &str = "update";
pub const POST_UPDATE: &str = "post_update";
pub const LAST: &str = "last";

/// Stages of the startup schedule, in execution order.
pub const STARTUP_STAGES: [&str; 3] = [PRE_STARTUP, STARTUP, POST_STARTUP];

/// Stages of the main schedule, in execution order.
pub const DEFAULT_STAGES: [&str; 7] = [
    FIRST,
    PRE_EVENT,
    EVENT,
    PRE_UPDATE,
    UPDATE,
    POST_UPDATE,
    LAST,
];

/// An ordered list of systems run together by an [`Executor`].
pub struct Stage {
    name: String,
    systems: Vec<Box<dyn System>>,
    /// Parallel to `systems`: whether `initialize` has succeeded.
    initialized: Vec<bool>,
    executor: Box<dyn Executor>,
}

impl Stage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            systems: Vec::new(),
            initialized: Vec::new(),
            executor: Box::new(SequentialExecutor),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a system.
    pub fn add_system(&mut self, system: Box<dyn System>) -> &mut Self {
        self.systems.push(system);
        self.initialized.push(false);
        self
    }

    /// Prepend a system.
    pub fn add_system_to_front(&mut self, system: Box<dyn System>) -> &mut Self {
        self.systems.insert(0, system);
        self.initialized.insert(0, false);
        self
    }

    pub fn set_executor(&mut self, executor: impl Executor + 'static) -> &mut Self {
        self.executor = Box::new(executor);
        self
    }

    /// Run `initialize` on every system that has not been initialized yet.
    pub fn initialize(
        &mut self,
        world: &mut World,
        resources: &mut Resources,
    ) -> Result<(), EcsError> {
        for (system, done) in self.systems.iter_mut().zip(self.initialized.iter_mut()) {
            if *done {
                continue;
            }
            system
                .initialize(world, resources)
                .map_err(|e| system_failed(&self.name, &**system, Hook::Initialize, e))?;
            *done = true;
        }
        Ok(())
    }

    /// Run one tick of every system through the executor.
    pub fn run(&mut self, world: &mut World, resources: &mut Resources) -> Result<(), EcsError> {
        self.executor
            .execute_stage(&self.name, &mut self.systems, world, resources)
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("systems", &self.system_names())
            .finish()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}]", self.name, self.system_names().join(", "))
    }
}
