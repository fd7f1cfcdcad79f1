use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use crate::error::EcsError;

/// Well-known resource keys shared by the core and gameplay plugins.
pub mod keys {
    /// `bool`: set to `true` to ask the loop runner to stop.
    pub const QUIT: &str = "sys.quit";
    /// `GameTime`
    pub const CLOCK: &str = "sys.clock";
    /// `TimerRegistry`
    pub const TIMERS: &str = "sys.timers";
    /// `Resolution`
    pub const RESOLUTION: &str = "sys.resolution";
    pub const KEYS_PRESSED: &str = "sys.keys_pressed";
    /// `Teardown` handle of the running app.
    pub const TEARDOWN: &str = "sys.teardown";
    /// `String`
    pub const TITLE: &str = "game.title";
    /// `f32`: scaled seconds elapsed during the last frame.
    pub const TIME_ELAPSED: &str = "game.time_elapsed";
    /// `EntityId` the camera follows.
    pub const CAMERA_TRACKING_ENTITY: &str = "game.camera.tracking_entity";
    pub const CONTROLLER_PREFIX: &str = "sys.controller";

    /// Key of the `Controller` for player `index` (1-based).
    pub fn controller(index: usize) -> String {
        format!("{CONTROLLER_PREFIX}{index}")
    }
}

struct Entry {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

/// Keyed storage for singleton values shared by every system.
///
/// Lookups are exact: a missing key or a value of another type is an error,
/// never a default.
#[derive(Default)]
pub struct Resources {
    map: HashMap<String, Entry>,
}

impl Resources {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Insert a resource, replacing any previous value under the same key.
    pub fn insert<T: 'static + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.map.insert(
            key.into(),
            Entry {
                value: Box::new(value),
                type_name: std::any::type_name::<T>(),
            },
        );
    }

    /// Get an immutable reference to a resource.
    pub fn get<T: 'static + Send + Sync>(&self, key: &str) -> Result<&T, EcsError> {
        let entry = self
            .map
            .get(key)
            .ok_or_else(|| EcsError::ResourceNotFound(key.to_string()))?;
        entry
            .value
            .downcast_ref::<T>()
            .ok_or_else(|| mismatch::<T>(key, entry.type_name))
    }

    /// Get a mutable reference to a resource.
    pub fn get_mut<T: 'static + Send + Sync>(&mut self, key: &str) -> Result<&mut T, EcsError> {
        let entry = self
            .map
            .get_mut(key)
            .ok_or_else(|| EcsError::ResourceNotFound(key.to_string()))?;
        let found = entry.type_name;
        entry
            .value
            .downcast_mut::<T>()
            .ok_or_else(|| mismatch::<T>(key, found))
    }

    /// Remove a resource, returning it. The entry stays in place when it
    /// holds a different type.
    pub fn remove<T: 'static + Send + Sync>(&mut self, key: &str) -> Result<T, EcsError> {
        self.get::<T>(key)?;
        let entry = self
            .map
            .remove(key)
            .ok_or_else(|| EcsError::ResourceNotFound(key.to_string()))?;
        let found = entry.type_name;
        entry
            .value
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| mismatch::<T>(key, found))
    }

    /// Check whether a resource exists under this key.
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Keys of all resources, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn mismatch<T>(key: &str, found: &'static str) -> EcsError {
    EcsError::ResourceTypeMismatch {
        key: key.to_string(),
        expected: std::any::type_name::<T>(),
        found,
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resources")?;
        for key in self.keys() {
            writeln!(f, "\t{key}: {}", self.map[key].type_name)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut res = Resources::new();
        res.insert("answer", 42u32);
        res.insert("greeting", "hello".to_string());
        assert_eq!(res.get::<u32>("answer").unwrap(), &42);
        assert_eq!(res.get::<String>("greeting").unwrap(), "hello");
    }

    #[test]
    fn controller_keys() {
        assert_eq!(keys::controller(1), "sys.controller1");
        assert_eq!(keys::controller(4), "sys.controller4");
    }

    #[test]
    fn replace() {
        let mut res = Resources::new();
        res.insert("n", 1u32);
        res.insert("n", 2u32);
        assert_eq!(res.get::<u32>("n").unwrap(), &2);
        assert_eq!(res.len(), 1);
    }

    #[test]
    fn mutate() {
        let mut res = Resources::new();
        res.insert("list", vec![1, 2, 3]);
        res.get_mut::<Vec<i32>>("list").unwrap().push(4);
        assert_eq!(res.get::<Vec<i32>>("list").unwrap().len(), 4);
    }

    #[test]
    fn missing_key_is_an_error() {
        let res = Resources::new();
        assert!(matches!(
            res.get::<bool>(keys::QUIT),
            Err(EcsError::ResourceNotFound(key)) if key == keys::QUIT
        ));
    }

    #[test]
    fn wrong_type_is_an_error() {
        let mut res = Resources::new();
        res.insert(keys::QUIT, false);
        assert!(matches!(
            res.get::<u32>(keys::QUIT),
            Err(EcsError::ResourceTypeMismatch { found: "bool", .. })
        ));
        assert!(res.remove::<u32>(keys::QUIT).is_err());
        assert!(res.contains(keys::QUIT));
    }

    #[test]
    fn remove_resource() {
        let mut res = Resources::new();
        res.insert("n", 99u32);
        assert_eq!(res.remove::<u32>("n").unwrap(), 99);
        assert!(!res.contains("n"));
    }

    #[test]
    fn display_lists_sorted_keys() {
        let mut res = Resources::new();
        res.insert("b", 1u8);
        res.insert("a", 2u8);
        assert_eq!(res.keys(), vec!["a", "b"]);
        assert!(res.to_string().contains("\ta: u8"));
    }
}
