use std::fmt;

use tracing::debug;

use crate::error::EcsError;
use crate::executor::Executor;
use crate::resource::Resources;
use crate::stage::Stage;
use crate::system::System;
use crate::world::World;

/// An ordered list of named stages. Stage order is the execution order;
/// there is no dependency resolution between stages or systems.
pub struct Schedule {
    name: String,
    stages: Vec<Stage>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            name: "Schedule".to_string(),
            stages: Vec::new(),
        }
    }

    /// Create a schedule called `<name>_Schedule`.
    pub fn named(name: &str) -> Self {
        let mut schedule = Self::new();
        schedule.set_name(name);
        schedule
    }

    /// Append stages with names known to be distinct.
    pub(crate) fn with_stages(mut self, names: &[&str]) -> Self {
        self.stages.extend(names.iter().map(|name| Stage::new(*name)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the schedule to `<name>_Schedule`.
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = format!("{name}_Schedule");
        self
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name() == name)
    }

    fn check_new(&self, name: &str) -> Result<(), EcsError> {
        if self.position(name).is_some() {
            return Err(EcsError::StageExists(name.to_string()));
        }
        Ok(())
    }

    fn target(&self, target: &str) -> Result<usize, EcsError> {
        self.position(target)
            .ok_or_else(|| EcsError::UnknownStage(target.to_string()))
    }

    fn insert_stage(&mut self, index: usize, name: &str) {
        debug!("{}: added stage '{}' at {}", self.name, name, index);
        self.stages.insert(index, Stage::new(name));
    }

    /// Append a stage.
    pub fn add_stage(&mut self, name: &str) -> Result<&mut Self, EcsError> {
        self.check_new(name)?;
        self.insert_stage(self.stages.len(), name);
        Ok(self)
    }

    /// Insert a stage directly before `target`.
    pub fn add_stage_before(&mut self, name: &str, target: &str) -> Result<&mut Self, EcsError> {
        self.check_new(name)?;
        let index = self.target(target)?;
        self.insert_stage(index, name);
        Ok(self)
    }

    /// Insert a stage directly after `target`.
    pub fn add_stage_after(&mut self, name: &str, target: &str) -> Result<&mut Self, EcsError> {
        self.check_new(name)?;
        let index = self.target(target)?;
        self.insert_stage(index + 1, name);
        Ok(self)
    }

    /// Append a system to the named stage.
    pub fn add_system_to_stage(
        &mut self,
        stage: &str,
        system: Box<dyn System>,
    ) -> Result<&mut Self, EcsError> {
        self.stage_mut(stage)?.add_system(system);
        Ok(self)
    }

    /// Prepend a system to the named stage.
    pub fn add_system_to_stage_front(
        &mut self,
        stage: &str,
        system: Box<dyn System>,
    ) -> Result<&mut Self, EcsError> {
        self.stage_mut(stage)?.add_system_to_front(system);
        Ok(self)
    }

    pub fn set_stage_executor(
        &mut self,
        stage: &str,
        executor: impl Executor + 'static,
    ) -> Result<&mut Self, EcsError> {
        self.stage_mut(stage)?.set_executor(executor);
        Ok(self)
    }

    pub fn stage(&self, name: &str) -> Result<&Stage, EcsError> {
        self.stages
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| EcsError::UnknownStage(name.to_string()))
    }

    pub fn stage_mut(&mut self, name: &str) -> Result<&mut Stage, EcsError> {
        self.stages
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| EcsError::UnknownStage(name.to_string()))
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Initialize every system not initialized yet, in stage order.
    pub fn initialize(
        &mut self,
        world: &mut World,
        resources: &mut Resources,
    ) -> Result<(), EcsError> {
        for stage in &mut self.stages {
            stage.initialize(world, resources)?;
        }
        Ok(())
    }

    /// Run one tick of every stage, in order. The first failure aborts the
    /// rest of the tick.
    pub fn run_once(
        &mut self,
        world: &mut World,
        resources: &mut Resources,
    ) -> Result<(), EcsError> {
        for stage in &mut self.stages {
            stage.run(world, resources)?;
        }
        Ok(())
    }

    pub fn initialize_and_run(
        &mut self,
        world: &mut World,
        resources: &mut Resources,
    ) -> Result<(), EcsError> {
        self.initialize(world, resources)?;
        self.run_once(world, resources)
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schedule")
            .field("name", &self.name)
            .field("stages", &self.stages)
            .finish()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for stage in &self.stages {
            writeln!(f, "\t{stage}")?;
        }
        Ok(())
    }
}
