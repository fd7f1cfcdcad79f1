use std::fmt;

use crate::resource::Resources;
use crate::world::World;

/// Result of a system hook. Hooks may fail with any error type.
pub type SystemResult = anyhow::Result<()>;

/// The three lifecycle hooks of a [`System`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Initialize,
    Update,
    RunOnce,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hook::Initialize => "initialize",
            Hook::Update => "update",
            Hook::RunOnce => "run_once",
        };
        f.write_str(name)
    }
}

/// A named unit of behavior operating on the world and resources.
///
/// `initialize` runs once before the system's first tick. Every tick then
/// calls `update` followed by `run_once`. All hooks default to doing
/// nothing, so a system implements only what it needs.
pub trait System: Send + Sync {
    fn name(&self) -> &str;

    fn initialize(&mut self, _world: &mut World, _resources: &mut Resources) -> SystemResult {
        Ok(())
    }

    fn update(&mut self, _world: &mut World, _resources: &mut Resources) -> SystemResult {
        Ok(())
    }

    fn run_once(&mut self, _world: &mut World, _resources: &mut Resources) -> SystemResult {
        Ok(())
    }
}

/// Blanket implementation so closures and functions can be used as systems.
/// They run in the `run_once` hook.
impl<F> System for F
where
    F: FnMut(&mut World, &mut Resources) -> SystemResult + Send + Sync,
{
    fn name(&self) -> &str {
        short_system_name(std::any::type_name::<F>())
    }

    fn run_once(&mut self, world: &mut World, resources: &mut Resources) -> SystemResult {
        (self)(world, resources)
    }
}

/// A system with an explicit name, for closures that would otherwise all be
/// called `<closure>`.
pub struct Named<S> {
    name: String,
    inner: S,
}

/// Give a system an explicit name.
pub fn named<S: System>(name: impl Into<String>, system: S) -> Named<S> {
    Named {
        name: name.into(),
        inner: system,
    }
}

impl<S: System> System for Named<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, world: &mut World, resources: &mut Resources) -> SystemResult {
        self.inner.initialize(world, resources)
    }

    fn update(&mut self, world: &mut World, resources: &mut Resources) -> SystemResult {
        self.inner.update(world, resources)
    }

    fn run_once(&mut self, world: &mut World, resources: &mut Resources) -> SystemResult {
        self.inner.run_once(world, resources)
    }
}

/// Last path segment of a type name; `<closure>` for closures.
pub(crate) fn short_system_name(full: &'static str) -> &'static str {
    let name = full.rsplit("::").next().unwrap_or(full);
    if name == "{{closure}}" {
        "<closure>"
    } else {
        name
    }
}
