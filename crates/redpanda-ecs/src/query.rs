use crate::component::ComponentSet;
use crate::entity::{Entities, Entity};

/// A read-only selector over the entity table, based on which component
/// names an entity carries.
///
/// Results keep the table's allocation order.
///
/// # Example
/// ```ignore
/// let walkers = world.query(&Query::has_all(["location", "velocity"]));
/// let renderable = world.query(&Query::of::<(Location, Sprite)>());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Query {
    /// Matches no entity.
    #[default]
    Nothing,
    /// Matches every entity.
    Everything,
    /// Entities carrying every listed component. An empty list matches all.
    HasAll(Vec<String>),
    /// Entities carrying at least one listed component.
    HasAny(Vec<String>),
    /// Entities carrying none of the listed components.
    HasNone(Vec<String>),
}

fn to_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

impl Query {
    pub fn has_all<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Query::HasAll(to_names(names))
    }

    pub fn has_any<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Query::HasAny(to_names(names))
    }

    pub fn has_none<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Query::HasNone(to_names(names))
    }

    /// `HasAll` over the names of a tuple of component types.
    pub fn of<C: ComponentSet>() -> Self {
        Query::has_all(C::names())
    }

    /// Whether a single entity satisfies the query.
    pub fn matches(&self, entity: &Entity) -> bool {
        match self {
            Query::Nothing => false,
            Query::Everything => true,
            Query::HasAll(names) => entity.has_all(names.as_slice()),
            Query::HasAny(names) => names.iter().any(|name| entity.has(name)),
            Query::HasNone(names) => !names.iter().any(|name| entity.has(name)),
        }
    }

    /// Every matching entity, in table order.
    pub fn select<'w>(&self, entities: &'w Entities) -> Vec<&'w Entity> {
        entities.iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    #[derive(Debug)]
    struct Location;

    impl Component for Location {
        const NAME: &'static str = "location";
    }

    #[derive(Debug)]
    struct Velocity;

    impl Component for Velocity {
        const NAME: &'static str = "velocity";
    }

    fn table() -> (Entities, Vec<redpanda_core::EntityId>) {
        let mut entities = Entities::new();
        let ids = vec![
            entities.alloc((Location, Velocity)).id(),
            entities.alloc((Location,)).id(),
            entities.alloc((Velocity,)).id(),
            entities.alloc(()).id(),
        ];
        (entities, ids)
    }

    fn ids(selected: Vec<&Entity>) -> Vec<redpanda_core::EntityId> {
        selected.into_iter().map(|e| e.id()).collect()
    }

    #[test]
    fn has_all_selects_supersets_in_order() {
        let (entities, all) = table();
        assert_eq!(
            ids(Query::has_all(["location"]).select(&entities)),
            vec![all[0], all[1]]
        );
        assert_eq!(
            ids(Query::of::<(Velocity, Location)>().select(&entities)),
            vec![all[0]]
        );
    }

    #[test]
    fn empty_requirement_matches_everything() {
        let (entities, all) = table();
        let empty: [&str; 0] = [];
        assert_eq!(ids(Query::has_all(empty).select(&entities)), all);
        assert_eq!(ids(Query::Everything.select(&entities)), all);
    }

    #[test]
    fn unknown_name_matches_nothing() {
        let (entities, _) = table();
        assert!(Query::has_all(["location", "sprite"])
            .select(&entities)
            .is_empty());
        assert!(Query::default().select(&entities).is_empty());
    }

    #[test]
    fn any_and_none_variants() {
        let (entities, all) = table();
        assert_eq!(
            ids(Query::has_any(["velocity"]).select(&entities)),
            vec![all[0], all[2]]
        );
        assert_eq!(
            ids(Query::has_none(["location", "velocity"]).select(&entities)),
            vec![all[3]]
        );
    }
}
