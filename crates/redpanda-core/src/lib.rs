//! Redpanda Core - Core types and utilities for the Redpanda ECS runtime
//!
//! This crate provides the foundational value types shared by the engine:
//! - Entity identifiers
//! - Axis-aligned rectangles for collision geometry (glam-backed)
//! - Frame clock for game time
//! - Game timers with fixed or randomized timeouts

pub mod time;
pub mod timer;
pub mod types;

pub use glam::Vec2;
pub use time::{GameTime, TimeConfig};
pub use timer::{Timer, TimerError, TimerId, TimerRegistry};
pub use types::{EntityId, Rect};
