use crate::error::EcsError;
use crate::resource::Resources;
use crate::system::{Hook, System};
use crate::world::World;

/// Strategy for invoking the systems of one stage.
pub trait Executor: Send + Sync {
    /// Run one tick of `systems`, in slice order.
    fn execute_stage(
        &mut self,
        stage: &str,
        systems: &mut [Box<dyn System>],
        world: &mut World,
        resources: &mut Resources,
    ) -> Result<(), EcsError>;
}

/// Runs each system's `update` then `run_once`, one system after another.
/// The first failure aborts the rest of the stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn execute_stage(
        &mut self,
        stage: &str,
        systems: &mut [Box<dyn System>],
        world: &mut World,
        resources: &mut Resources,
    ) -> Result<(), EcsError> {
        for system in systems.iter_mut() {
            system
                .update(world, resources)
                .map_err(|e| system_failed(stage, &**system, Hook::Update, e))?;
            system
                .run_once(world, resources)
                .map_err(|e| system_failed(stage, &**system, Hook::RunOnce, e))?;
        }
        Ok(())
    }
}

pub(crate) fn system_failed(
    stage: &str,
    system: &dyn System,
    hook: Hook,
    source: anyhow::Error,
) -> EcsError {
    EcsError::SystemFailed {
        stage: stage.to_string(),
        system: system.name().to_string(),
        hook,
        source,
    }
}
