//! Redpanda ECS - Entity Component System
//!
//! Entities are unique ids carrying named components. Systems run in
//! named stages, stages run in schedule order, and an [`App`] ties the
//! world, resources and schedules together. Execution is single-threaded
//! and strictly ordered: stage order first, then system order within a
//! stage.

mod app;
mod area;
mod component;
pub mod components;
mod entity;
mod error;
mod executor;
mod plugin;
mod query;
mod renderable;
pub mod resource;
mod runner;
mod schedule;
pub mod stage;
mod system;
mod teardown;
mod world;

pub use app::{App, AppBuilder, Runner};
pub use area::{
    Area, AreaRenderer, JsonMapFile, MapData, MapObject, MapSource, StaticMap, DOOR,
    SOLID_COLLISION,
};
pub use component::{AnyComponent, BoxedComponent, Bundle, Component, ComponentSet};
pub use entity::{Entities, Entity};
pub use error::{AreaError, EcsError};
pub use executor::{Executor, SequentialExecutor};
pub use plugin::{
    AdvanceClock, Controller, CorePlugin, Plugin, Resolution, TickTimers, CONTROLLERS,
};
pub use query::Query;
pub use renderable::Renderable;
pub use resource::{keys, Resources};
pub use runner::{run_once, LoopRunner};
pub use schedule::Schedule;
pub use stage::Stage;
pub use system::{named, Hook, Named, System, SystemResult};
pub use teardown::Teardown;
pub use world::World;
