use std::path::PathBuf;

use redpanda_core::EntityId;

use crate::system::Hook;

/// Errors raised by the ECS core: bad build sequences, failed lookups and
/// failures propagated out of system hooks.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    #[error("stage already exists: {0}")]
    StageExists(String),

    #[error("stage does not exist: {0}")]
    UnknownStage(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("resource '{key}' holds {found}, not {expected}")]
    ResourceTypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("entity {entity} has no component '{name}'")]
    ComponentNotFound { entity: EntityId, name: String },

    #[error("component '{name}' on entity {entity} is not a {expected}")]
    ComponentTypeMismatch {
        entity: EntityId,
        name: &'static str,
        expected: &'static str,
    },

    #[error("entity {entity} is not renderable, missing {missing:?}")]
    NotRenderable {
        entity: EntityId,
        missing: Vec<&'static str>,
    },

    #[error("invalid area: {name}, valid ones {valid:?}")]
    UnknownArea { name: String, valid: Vec<String> },

    #[error("no area has been entered")]
    NoCurrentArea,

    #[error(transparent)]
    Area(#[from] AreaError),

    #[error("system '{system}' failed in {hook} (stage '{stage}')")]
    SystemFailed {
        stage: String,
        system: String,
        hook: Hook,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors raised while loading or drawing an [`Area`](crate::Area).
#[derive(Debug, thiserror::Error)]
pub enum AreaError {
    #[error("I/O error loading map {0:?}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse map {0:?}: {1}")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("area '{0}' has no renderer attached")]
    NoRenderer(String),

    #[error("area '{0}' is not loaded")]
    NotLoaded(String),

    #[error("renderer failed for area '{area}'")]
    Render {
        area: String,
        #[source]
        source: anyhow::Error,
    },
}
