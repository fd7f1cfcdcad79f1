use std::any::Any;
use std::fmt;

/// Data that can be attached to an entity. Each entity holds at most one
/// component per [`NAME`](Component::NAME); queries select on these names.
pub trait Component: Any + Send + Sync + fmt::Debug {
    const NAME: &'static str;
}

/// Object-safe view of a component, used for storage on an entity.
pub trait AnyComponent: Any + Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyComponent for T {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A component erased to its name and value.
pub type BoxedComponent = Box<dyn AnyComponent>;

/// A group of components attached in one call (`spawn`, `add_components`).
///
/// Implemented for `()`, `Vec<BoxedComponent>` and tuples of up to eight
/// components.
pub trait Bundle {
    fn into_components(self) -> Vec<BoxedComponent>;
}

impl Bundle for () {
    fn into_components(self) -> Vec<BoxedComponent> {
        Vec::new()
    }
}

impl Bundle for Vec<BoxedComponent> {
    fn into_components(self) -> Vec<BoxedComponent> {
        self
    }
}

macro_rules! impl_bundle_tuple {
    ($($name:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($name: Component),+> Bundle for ($($name,)+) {
            fn into_components(self) -> Vec<BoxedComponent> {
                let ($($name,)+) = self;
                vec![$(Box::new($name) as BoxedComponent),+]
            }
        }
    };
}

impl_bundle_tuple!(A);
impl_bundle_tuple!(A, B);
impl_bundle_tuple!(A, B, C);
impl_bundle_tuple!(A, B, C, D);
impl_bundle_tuple!(A, B, C, D, E);
impl_bundle_tuple!(A, B, C, D, E, F);
impl_bundle_tuple!(A, B, C, D, E, F, G);
impl_bundle_tuple!(A, B, C, D, E, F, G, H);

/// A set of component types, used to build queries from types instead of
/// spelled-out names.
pub trait ComponentSet {
    fn names() -> Vec<&'static str>;
}

macro_rules! impl_component_set_tuple {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn names() -> Vec<&'static str> {
                vec![$($name::NAME),+]
            }
        }
    };
}

impl_component_set_tuple!(A);
impl_component_set_tuple!(A, B);
impl_component_set_tuple!(A, B, C);
impl_component_set_tuple!(A, B, C, D);
impl_component_set_tuple!(A, B, C, D, E);
impl_component_set_tuple!(A, B, C, D, E, F);
impl_component_set_tuple!(A, B, C, D, E, F, G);
impl_component_set_tuple!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    impl Component for Health {
        const NAME: &'static str = "health";
    }

    #[derive(Debug, PartialEq)]
    struct Tag;

    impl Component for Tag {
        const NAME: &'static str = "tag";
    }

    #[test]
    fn boxed_component_keeps_name_and_value() {
        let boxed: BoxedComponent = Box::new(Health(7));
        assert_eq!(boxed.name(), "health");
        assert_eq!(boxed.as_any().downcast_ref::<Health>(), Some(&Health(7)));
    }

    #[test]
    fn tuple_bundle_order() {
        let components = (Health(1), Tag).into_components();
        let names: Vec<_> = components.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["health", "tag"]);
        assert!(().into_components().is_empty());
    }

    #[test]
    fn component_set_names() {
        assert_eq!(<(Tag, Health)>::names(), vec!["tag", "health"]);
    }
}
