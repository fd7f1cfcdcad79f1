use std::collections::HashMap;
use std::fmt;

use redpanda_core::{EntityId, Rect};
use tracing::{error, info};

use crate::area::Area;
use crate::component::{BoxedComponent, Bundle};
use crate::entity::{Entities, Entity};
use crate::error::EcsError;
use crate::query::Query;

/// The central ECS container. Owns all entities and the named areas, and
/// tracks which area is current.
#[derive(Debug, Default)]
pub struct World {
    entities: Entities,
    areas: HashMap<String, Area>,
    current_area: Option<String>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Entity management ----

    /// Spawn a new entity carrying the bundle's components.
    ///
    /// The entity is not placed in any area; use
    /// [`place_in_current_area`](Self::place_in_current_area) for that.
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> EntityId {
        self.entities.alloc(bundle).id()
    }

    /// Remove an entity from the world and drop its components. Area groups
    /// are left untouched.
    pub fn despawn(&mut self, id: EntityId) -> Result<(), EcsError> {
        let mut entity = self.entities.release(id)?;
        entity.clear();
        Ok(())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains(id)
    }

    /// Despawn every entity.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity, EcsError> {
        self.entities.get(id).ok_or(EcsError::EntityNotFound(id))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, EcsError> {
        self.entities.get_mut(id).ok_or(EcsError::EntityNotFound(id))
    }

    /// Add components to an existing entity, replacing same-named ones.
    pub fn insert<B: Bundle>(&mut self, id: EntityId, bundle: B) -> Result<(), EcsError> {
        self.entity_mut(id)?.add_components(bundle);
        Ok(())
    }

    /// Detach a single component by name.
    pub fn remove_one(&mut self, id: EntityId, name: &str) -> Result<BoxedComponent, EcsError> {
        self.entity_mut(id)?.remove(name)
    }

    /// Remove every component but keep the entity alive.
    pub fn strip(&mut self, id: EntityId) -> Result<(), EcsError> {
        self.entity_mut(id)?.clear();
        Ok(())
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // ---- Queries ----

    /// Entities matching the query, in allocation order.
    pub fn query(&self, query: &Query) -> Vec<&Entity> {
        query.select(&self.entities)
    }

    /// Ids of the entities matching the query, in allocation order.
    pub fn query_ids(&self, query: &Query) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| query.matches(e))
            .map(Entity::id)
            .collect()
    }

    /// Mutable access to every matching entity.
    pub fn query_mut(&mut self, query: &Query) -> Vec<&mut Entity> {
        self.entities
            .iter_mut()
            .filter(|e| query.matches(e))
            .collect()
    }

    // ---- Areas ----

    /// Register an area under its name, replacing any area with that name.
    pub fn add_area(&mut self, area: Area) {
        let name = area.name().to_string();
        if self.areas.insert(name.clone(), area).is_some() {
            info!("Replaced area '{}'", name);
        }
    }

    /// Leave the current area and enter `name`.
    ///
    /// An unknown name is reported and leaves the current area as it was.
    /// If the new area fails to load there is no current area afterwards.
    pub fn enter_area(&mut self, name: &str) -> Result<(), EcsError> {
        if !self.areas.contains_key(name) {
            let valid = self.area_names();
            error!("Invalid area: {}, valid ones {:?}", name, valid);
            return Err(EcsError::UnknownArea {
                name: name.to_string(),
                valid,
            });
        }

        if let Some(current) = self.current_area.take() {
            if let Some(area) = self.areas.get_mut(&current) {
                area.leave();
            }
        }

        let area = self
            .areas
            .get_mut(name)
            .ok_or_else(|| EcsError::UnknownArea {
                name: name.to_string(),
                valid: Vec::new(),
            })?;
        area.enter()?;
        self.current_area = Some(name.to_string());
        Ok(())
    }

    /// Names of all registered areas, sorted.
    pub fn area_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.areas.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn area(&self, name: &str) -> Option<&Area> {
        self.areas.get(name)
    }

    pub fn area_mut(&mut self, name: &str) -> Option<&mut Area> {
        self.areas.get_mut(name)
    }

    pub fn current_area_name(&self) -> Option<&str> {
        self.current_area.as_deref()
    }

    pub fn current_area(&self) -> Result<&Area, EcsError> {
        self.current_area
            .as_ref()
            .and_then(|name| self.areas.get(name))
            .ok_or(EcsError::NoCurrentArea)
    }

    pub fn current_area_mut(&mut self) -> Result<&mut Area, EcsError> {
        match &self.current_area {
            Some(name) => self.areas.get_mut(name).ok_or(EcsError::NoCurrentArea),
            None => Err(EcsError::NoCurrentArea),
        }
    }

    /// Check `rect` against the current area's walls and doors.
    pub fn collide_check(&self, rect: &Rect) -> Result<bool, EcsError> {
        Ok(self.current_area()?.collide_check(rect))
    }

    /// Place an existing entity in the current area's group.
    pub fn place_in_current_area(&mut self, id: EntityId) -> Result<(), EcsError> {
        if !self.entities.contains(id) {
            return Err(EcsError::EntityNotFound(id));
        }
        self.current_area_mut()?.add(id);
        Ok(())
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "World")?;
        writeln!(f, "\tEntities")?;
        for line in self.entities.to_string().lines() {
            writeln!(f, "\t\t{}", line.trim_start())?;
        }
        writeln!(f, "\tAreas")?;
        for name in self.area_names() {
            let marker = if self.current_area.as_deref() == Some(name.as_str()) {
                "*"
            } else {
                " "
            };
            writeln!(f, "\t{marker}\t{}", self.areas[&name])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{MapData, MapObject, StaticMap, SOLID_COLLISION};
    use crate::component::Component;

    #[derive(Debug, PartialEq)]
    struct Position(f32, f32);

    impl Component for Position {
        const NAME: &'static str = "position";
    }

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    impl Component for Health {
        const NAME: &'static str = "health";
    }

    fn walled_area(name: &str, wall: Rect) -> Area {
        Area::new(
            name,
            StaticMap(MapData {
                objects: vec![MapObject::new(SOLID_COLLISION, wall)],
            }),
        )
    }

    #[test]
    fn spawn_and_despawn() {
        let mut world = World::new();
        let e1 = world.spawn((Position(0.0, 0.0),));
        let e2 = world.spawn((Position(1.0, 1.0), Health(100)));
        assert_eq!(world.entity_count(), 2);

        world.despawn(e1).unwrap();
        assert!(!world.contains(e1));
        assert!(world.contains(e2));
        assert!(matches!(world.despawn(e1), Err(EcsError::EntityNotFound(_))));
        assert!(world.query(&Query::has_all(["position"])).len() == 1);
    }

    #[test]
    fn insert_remove_and_strip() {
        let mut world = World::new();
        let e = world.spawn(());
        world.insert(e, (Health(5),)).unwrap();
        assert_eq!(world.entity(e).unwrap().get::<Health>().unwrap(), &Health(5));

        world.remove_one(e, "health").unwrap();
        assert!(world.remove_one(e, "health").is_err());

        world.insert(e, (Health(1), Position(0.0, 0.0))).unwrap();
        world.strip(e).unwrap();
        assert!(world.entity(e).unwrap().is_empty());
        assert!(world.contains(e));
    }

    #[test]
    fn query_mut_updates_matching_entities() {
        let mut world = World::new();
        let a = world.spawn((Position(0.0, 0.0), Health(10)));
        let b = world.spawn((Health(20),));

        for entity in world.query_mut(&Query::of::<(Position, Health)>()) {
            entity.get_mut::<Health>().unwrap().0 += 1;
        }
        assert_eq!(world.entity(a).unwrap().get::<Health>().unwrap().0, 11);
        assert_eq!(world.entity(b).unwrap().get::<Health>().unwrap().0, 20);
        assert_eq!(world.query_ids(&Query::has_all(["health"])), vec![a, b]);
    }

    #[test]
    fn collide_check_needs_a_current_area() {
        let mut world = World::new();
        world.add_area(walled_area("field", Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(matches!(
            world.collide_check(&Rect::new(5.0, 5.0, 2.0, 2.0)),
            Err(EcsError::NoCurrentArea)
        ));

        world.enter_area("field").unwrap();
        assert!(world.collide_check(&Rect::new(5.0, 5.0, 2.0, 2.0)).unwrap());
        assert!(!world.collide_check(&Rect::new(20.0, 20.0, 2.0, 2.0)).unwrap());
    }

    #[test]
    fn unknown_area_keeps_current() {
        let mut world = World::new();
        world.add_area(walled_area("field", Rect::new(0.0, 0.0, 10.0, 10.0)));
        world.enter_area("field").unwrap();

        match world.enter_area("nope") {
            Err(EcsError::UnknownArea { name, valid }) => {
                assert_eq!(name, "nope");
                assert_eq!(valid, vec!["field".to_string()]);
            }
            other => panic!("expected UnknownArea, got: {:?}", other),
        }
        assert_eq!(world.current_area_name(), Some("field"));
        assert!(world.collide_check(&Rect::new(5.0, 5.0, 2.0, 2.0)).unwrap());
    }

    #[test]
    fn unknown_area_on_a_fresh_world() {
        let mut world = World::new();
        world.add_area(walled_area("field", Rect::new(0.0, 0.0, 10.0, 10.0)));

        assert!(matches!(
            world.enter_area("nope"),
            Err(EcsError::UnknownArea { .. })
        ));
        assert_eq!(world.current_area_name(), None);
        assert!(!world.area("field").unwrap().is_loaded());
        assert!(matches!(
            world.collide_check(&Rect::new(5.0, 5.0, 2.0, 2.0)),
            Err(EcsError::NoCurrentArea)
        ));
    }

    #[test]
    fn switching_areas_leaves_the_old_one() {
        let mut world = World::new();
        world.add_area(walled_area("field", Rect::new(0.0, 0.0, 10.0, 10.0)));
        world.add_area(walled_area("cave", Rect::new(100.0, 100.0, 10.0, 10.0)));

        world.enter_area("field").unwrap();
        world.enter_area("cave").unwrap();
        assert!(!world.area("field").unwrap().is_loaded());
        assert!(!world.collide_check(&Rect::new(5.0, 5.0, 2.0, 2.0)).unwrap());
        assert!(world.collide_check(&Rect::new(105.0, 105.0, 1.0, 1.0)).unwrap());
    }

    #[test]
    fn placement_is_explicit() {
        let mut world = World::new();
        world.add_area(walled_area("field", Rect::new(0.0, 0.0, 10.0, 10.0)));
        world.enter_area("field").unwrap();

        let e = world.spawn((Position(0.0, 0.0),));
        assert!(world.current_area().unwrap().placed().is_empty());
        world.place_in_current_area(e).unwrap();
        assert!(world.current_area().unwrap().contains(e));

        // despawn leaves the area group alone
        world.despawn(e).unwrap();
        assert!(world.current_area().unwrap().contains(e));
        assert!(world.place_in_current_area(e).is_err());
    }

    #[test]
    fn display_marks_current_area() {
        let mut world = World::new();
        world.add_area(walled_area("field", Rect::new(0.0, 0.0, 1.0, 1.0)));
        world.enter_area("field").unwrap();
        world.spawn((Health(1),));
        let text = world.to_string();
        assert!(text.contains("health"));
        assert!(text.contains("*\tfield"));
    }
}
