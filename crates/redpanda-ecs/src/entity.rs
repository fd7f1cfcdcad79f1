use std::collections::HashMap;
use std::fmt;

use redpanda_core::EntityId;

use crate::component::{AnyComponent, BoxedComponent, Bundle, Component};
use crate::error::EcsError;

/// A unique id plus the named components attached to it.
///
/// Entities are owned by [`Entities`]; gameplay code reaches them through
/// the [`World`](crate::World).
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    components: HashMap<&'static str, BoxedComponent>,
}

impl Entity {
    pub(crate) fn new() -> Self {
        Self {
            id: EntityId::new(),
            components: HashMap::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Remove every component.
    pub fn clear(&mut self) -> &mut Self {
        self.components.clear();
        self
    }

    /// Attach a component, replacing any component with the same name.
    pub fn add_component<C: Component>(&mut self, component: C) -> &mut Self {
        self.components.insert(C::NAME, Box::new(component));
        self
    }

    /// Attach an already boxed component, replacing any with the same name.
    pub fn add_boxed(&mut self, component: BoxedComponent) -> &mut Self {
        self.components.insert(component.name(), component);
        self
    }

    /// Attach every component of the bundle, in order. Later entries win
    /// over earlier ones with the same name.
    pub fn add_components<B: Bundle>(&mut self, bundle: B) -> &mut Self {
        for component in bundle.into_components() {
            self.add_boxed(component);
        }
        self
    }

    /// Detach the component with the given name.
    pub fn remove(&mut self, name: &str) -> Result<BoxedComponent, EcsError> {
        self.components
            .remove(name)
            .ok_or_else(|| EcsError::ComponentNotFound {
                entity: self.id,
                name: name.to_string(),
            })
    }

    /// Whether a component with this name is attached.
    pub fn has(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Whether every name in `names` is attached.
    pub fn has_all<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|name| self.has(name.as_ref()))
    }

    pub fn get<C: Component>(&self) -> Result<&C, EcsError> {
        let component = self.get_by_name(C::NAME)?;
        component
            .as_any()
            .downcast_ref::<C>()
            .ok_or(EcsError::ComponentTypeMismatch {
                entity: self.id,
                name: C::NAME,
                expected: std::any::type_name::<C>(),
            })
    }

    pub fn get_mut<C: Component>(&mut self) -> Result<&mut C, EcsError> {
        let id = self.id;
        let component = self
            .components
            .get_mut(C::NAME)
            .ok_or_else(|| EcsError::ComponentNotFound {
                entity: id,
                name: C::NAME.to_string(),
            })?;
        component
            .as_any_mut()
            .downcast_mut::<C>()
            .ok_or(EcsError::ComponentTypeMismatch {
                entity: id,
                name: C::NAME,
                expected: std::any::type_name::<C>(),
            })
    }

    /// Look up a component without knowing its type.
    pub fn get_by_name(&self, name: &str) -> Result<&dyn AnyComponent, EcsError> {
        self.components
            .get(name)
            .map(|c| &**c)
            .ok_or_else(|| EcsError::ComponentNotFound {
                entity: self.id,
                name: name.to_string(),
            })
    }

    /// Names of the attached components, sorted.
    pub fn component_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.components.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.id)?;
        for name in self.component_names() {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}

/// The canonical entity table. Iteration follows allocation order.
#[derive(Debug, Default)]
pub struct Entities {
    entities: Vec<Entity>,
    /// Maps entity id → position in `entities`.
    index: HashMap<EntityId, usize>,
}

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity carrying the bundle's components.
    pub fn alloc<B: Bundle>(&mut self, bundle: B) -> &mut Entity {
        let mut entity = Entity::new();
        while self.index.contains_key(&entity.id) {
            entity.id = EntityId::new();
        }
        entity.add_components(bundle);

        let slot = self.entities.len();
        self.index.insert(entity.id, slot);
        self.entities.push(entity);
        &mut self.entities[slot]
    }

    /// Remove an entity from the table and hand it back.
    pub fn release(&mut self, id: EntityId) -> Result<Entity, EcsError> {
        let slot = self.index.remove(&id).ok_or(EcsError::EntityNotFound(id))?;
        let entity = self.entities.remove(slot);
        // Keep allocation order: every later entity shifts down one slot.
        for moved in &self.entities[slot..] {
            if let Some(position) = self.index.get_mut(&moved.id) {
                *position -= 1;
            }
        }
        Ok(entity)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&slot| &self.entities[slot])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = *self.index.get(&id)?;
        Some(&mut self.entities[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Destroy every entity.
    pub fn clear(&mut self) {
        for entity in &mut self.entities {
            entity.clear();
        }
        self.index.clear();
        self.entities.clear();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl fmt::Display for Entities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entities.is_empty() {
            return write!(f, "<EMPTY>");
        }
        for entity in &self.entities {
            writeln!(f, "\t{entity}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, PartialEq)]
    struct Position(i32, i32);

    impl Component for Position {
        const NAME: &'static str = "position";
    }

    #[derive(Debug, PartialEq)]
    struct Label(&'static str);

    impl Component for Label {
        const NAME: &'static str = "label";
    }

    /// Same name as `Position`, different type.
    #[derive(Debug)]
    struct FakePosition;

    impl Component for FakePosition {
        const NAME: &'static str = "position";
    }

    #[test]
    fn alloc_issues_unique_ids() {
        let mut entities = Entities::new();
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let id = entities.alloc(()).id();
            assert!(seen.insert(id));
        }
        let released: Vec<_> = entities.iter().take(50).map(|e| e.id()).collect();
        for id in released {
            entities.release(id).unwrap();
        }
        for _ in 0..50 {
            let id = entities.alloc(()).id();
            assert!(seen.insert(id));
        }
        assert_eq!(entities.len(), 100);
    }

    #[test]
    fn last_write_wins() {
        let mut entities = Entities::new();
        let entity = entities.alloc((Position(1, 1),));
        entity.add_component(Position(2, 3));
        assert_eq!(entity.get::<Position>().unwrap(), &Position(2, 3));
        assert_eq!(entity.len(), 1);
    }

    #[test]
    fn remove_missing_component_fails() {
        let mut entities = Entities::new();
        let entity = entities.alloc((Label("a"),));
        assert!(entity.remove("label").is_ok());
        assert!(matches!(
            entity.remove("label"),
            Err(EcsError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn typed_lookup_errors() {
        let mut entities = Entities::new();
        let entity = entities.alloc((FakePosition,));
        assert!(matches!(
            entity.get::<Position>(),
            Err(EcsError::ComponentTypeMismatch { name: "position", .. })
        ));
        assert!(matches!(
            entity.get::<Label>(),
            Err(EcsError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn get_mut_modifies_in_place() {
        let mut entities = Entities::new();
        let id = entities.alloc((Position(0, 0),)).id();
        entities.get_mut(id).unwrap().get_mut::<Position>().unwrap().0 = 9;
        assert_eq!(
            entities.get(id).unwrap().get::<Position>().unwrap(),
            &Position(9, 0)
        );
    }

    #[test]
    fn release_keeps_order_and_index() {
        let mut entities = Entities::new();
        let a = entities.alloc(()).id();
        let b = entities.alloc(()).id();
        let c = entities.alloc(()).id();

        let released = entities.release(a).unwrap();
        assert_eq!(released.id(), a);
        assert!(!entities.contains(a));
        assert!(matches!(entities.release(a), Err(EcsError::EntityNotFound(_))));

        let order: Vec<_> = entities.iter().map(|e| e.id()).collect();
        assert_eq!(order, vec![b, c]);
        assert_eq!(entities.get(c).unwrap().id(), c);
    }

    #[test]
    fn clear_and_display() {
        let mut entities = Entities::new();
        entities.alloc((Position(0, 0), Label("x")));
        let text = entities.to_string();
        assert!(text.contains("label position"));

        entities.clear();
        assert!(entities.is_empty());
        assert_eq!(entities.to_string(), "<EMPTY>");
    }
}
