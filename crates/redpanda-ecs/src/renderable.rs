use redpanda_core::{EntityId, Rect};

use crate::component::ComponentSet;
use crate::components::{Animation, Direction, Location, Sprite};
use crate::entity::Entity;
use crate::error::EcsError;
use crate::query::Query;

/// Borrowed view of everything a renderer needs from an entity.
///
/// Building the view checks the whole capability bundle up front, so a
/// renderer never hits a half-configured entity.
#[derive(Debug, Clone, Copy)]
pub struct Renderable<'a> {
    pub entity: EntityId,
    pub location: &'a Location,
    pub sprite: &'a Sprite,
    pub animation: &'a Animation,
    pub direction: &'a Direction,
}

type Parts = (Location, Sprite, Animation, Direction);

impl<'a> Renderable<'a> {
    /// Component names required by the capability.
    pub fn required() -> Vec<&'static str> {
        <Parts as ComponentSet>::names()
    }

    /// Query selecting renderable entities.
    pub fn query() -> Query {
        Query::of::<Parts>()
    }

    pub fn from_entity(entity: &'a Entity) -> Result<Self, EcsError> {
        let missing: Vec<_> = Self::required()
            .into_iter()
            .filter(|name| !entity.has(name))
            .collect();
        if !missing.is_empty() {
            return Err(EcsError::NotRenderable {
                entity: entity.id(),
                missing,
            });
        }
        Ok(Self {
            entity: entity.id(),
            location: entity.get::<Location>()?,
            sprite: entity.get::<Sprite>()?,
            animation: entity.get::<Animation>()?,
            direction: entity.get::<Direction>()?,
        })
    }

    /// Screen-space bounds: location plus one sprite frame.
    pub fn rect(&self) -> Rect {
        Rect::from_position_size(self.location.position(), self.sprite.frame_size)
    }

    /// Collision footprint at the bottom of the bounds.
    pub fn feet(&self) -> Rect {
        self.rect().feet()
    }
}
