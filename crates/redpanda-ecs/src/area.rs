use std::fmt;
use std::path::PathBuf;

use glam::Vec2;
use redpanda_core::{EntityId, Rect};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AreaError;

/// Map object kind that blocks movement.
pub const SOLID_COLLISION: &str = "SolidCollision";
/// Map object kind marking a passage to another area. Doors block too.
pub const DOOR: &str = "Door";

/// One object from a map's object layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub name: Option<String>,
}

impl MapObject {
    pub fn new(kind: impl Into<String>, rect: Rect) -> Self {
        Self {
            kind: kind.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            name: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Everything an area needs from its map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

/// Where an area gets its map from.
pub trait MapSource: Send + Sync {
    fn load(&self) -> Result<MapData, AreaError>;
}

/// A map held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticMap(pub MapData);

impl MapSource for StaticMap {
    fn load(&self) -> Result<MapData, AreaError> {
        Ok(self.0.clone())
    }
}

/// A JSON map file on disk, read on every `enter`.
#[derive(Debug, Clone)]
pub struct JsonMapFile {
    pub path: PathBuf,
}

impl JsonMapFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MapSource for JsonMapFile {
    fn load(&self) -> Result<MapData, AreaError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| AreaError::Io(self.path.clone(), e))?;
        serde_json::from_str(&text).map_err(|e| AreaError::Parse(self.path.clone(), e))
    }
}

/// Drawing backend for an area. Implemented by the rendering layer.
pub trait AreaRenderer: Send + Sync {
    /// Recenter the view on a world position.
    fn center(&mut self, camera_center: Vec2);
    /// Draw the map and the placed entities.
    fn draw(&mut self, placed: &[EntityId]) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
struct Geometry {
    walls: Vec<Rect>,
    doors: Vec<Rect>,
    /// Walls followed by doors.
    stationary: Vec<Rect>,
}

/// A named subsection of the world with its own static collision geometry
/// and the group of entities placed in it.
pub struct Area {
    name: String,
    source: Box<dyn MapSource>,
    renderer: Option<Box<dyn AreaRenderer>>,
    loaded: Option<Geometry>,
    placed: Vec<EntityId>,
}

impl Area {
    pub fn new(name: impl Into<String>, source: impl MapSource + 'static) -> Self {
        Self {
            name: name.into(),
            source: Box::new(source),
            renderer: None,
            loaded: None,
            placed: Vec::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: impl AreaRenderer + 'static) -> Self {
        self.set_renderer(renderer);
        self
    }

    pub fn set_renderer(&mut self, renderer: impl AreaRenderer + 'static) {
        self.renderer = Some(Box::new(renderer));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load the map and rebuild the collision geometry from scratch.
    pub fn enter(&mut self) -> Result<(), AreaError> {
        let map = self.source.load()?;

        let mut geometry = Geometry::default();
        for object in &map.objects {
            match object.kind.as_str() {
                SOLID_COLLISION => geometry.walls.push(object.rect()),
                DOOR => geometry.doors.push(object.rect()),
                _ => {}
            }
        }
        geometry.stationary.extend(&geometry.walls);
        geometry.stationary.extend(&geometry.doors);

        info!(
            "Entered area '{}': {} walls, {} doors",
            self.name,
            geometry.walls.len(),
            geometry.doors.len()
        );
        self.loaded = Some(geometry);
        Ok(())
    }

    /// Drop the loaded geometry. The placed group is kept.
    pub fn leave(&mut self) {
        if self.loaded.take().is_some() {
            debug!("Left area '{}'", self.name);
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn walls(&self) -> &[Rect] {
        self.loaded
            .as_ref()
            .map(|g| g.walls.as_slice())
            .unwrap_or_default()
    }

    pub fn doors(&self) -> &[Rect] {
        self.loaded
            .as_ref()
            .map(|g| g.doors.as_slice())
            .unwrap_or_default()
    }

    /// Whether `rect` overlaps any wall or door. Always false before `enter`.
    pub fn collide_check(&self, rect: &Rect) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|g| rect.collide_list(&g.stationary).is_some())
    }

    // ---- Placed entities ----

    /// Place an entity in this area's group. Placing twice is a no-op.
    pub fn add(&mut self, entity: EntityId) {
        if !self.placed.contains(&entity) {
            self.placed.push(entity);
        }
    }

    /// Take an entity out of the group. Returns `true` if it was placed.
    pub fn remove(&mut self, entity: EntityId) -> bool {
        let before = self.placed.len();
        self.placed.retain(|&e| e != entity);
        self.placed.len() != before
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.placed.contains(&entity)
    }

    pub fn placed(&self) -> &[EntityId] {
        &self.placed
    }

    /// Recenter the renderer on `camera_center` and draw the area.
    pub fn render(&mut self, camera_center: Vec2) -> Result<(), AreaError> {
        if self.loaded.is_none() {
            return Err(AreaError::NotLoaded(self.name.clone()));
        }
        let renderer = self
            .renderer
            .as_mut()
            .ok_or_else(|| AreaError::NoRenderer(self.name.clone()))?;
        renderer.center(camera_center);
        renderer
            .draw(&self.placed)
            .map_err(|source| AreaError::Render {
                area: self.name.clone(),
                source,
            })
    }
}

impl fmt::Debug for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Area")
            .field("name", &self.name)
            .field("loaded", &self.loaded)
            .field("placed", &self.placed)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_loaded() {
            write!(
                f,
                " (walls: {}, doors: {}, placed: {})",
                self.walls().len(),
                self.doors().len(),
                self.placed.len()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn single_wall() -> StaticMap {
        StaticMap(MapData {
            objects: vec![MapObject::new(SOLID_COLLISION, Rect::new(0.0, 0.0, 10.0, 10.0))],
        })
    }

    #[test]
    fn collide_check_against_walls() {
        let mut area = Area::new("field", single_wall());
        area.enter().unwrap();
        assert!(area.collide_check(&Rect::new(5.0, 5.0, 2.0, 2.0)));
        assert!(!area.collide_check(&Rect::new(20.0, 20.0, 2.0, 2.0)));
    }

    #[test]
    fn doors_block_and_other_kinds_do_not() {
        let map = StaticMap(MapData {
            objects: vec![
                MapObject::new(DOOR, Rect::new(50.0, 0.0, 10.0, 10.0)),
                MapObject::new("Decoration", Rect::new(100.0, 0.0, 10.0, 10.0)),
            ],
        });
        let mut area = Area::new("house", map);
        area.enter().unwrap();
        assert_eq!(area.doors().len(), 1);
        assert!(area.walls().is_empty());
        assert!(area.collide_check(&Rect::new(55.0, 5.0, 1.0, 1.0)));
        assert!(!area.collide_check(&Rect::new(105.0, 5.0, 1.0, 1.0)));
    }

    #[test]
    fn leave_unloads_geometry() {
        let mut area = Area::new("field", single_wall());
        assert!(!area.collide_check(&Rect::new(5.0, 5.0, 2.0, 2.0)));
        area.enter().unwrap();
        area.enter().unwrap();
        assert_eq!(area.walls().len(), 1);
        area.leave();
        assert!(!area.is_loaded());
        assert!(!area.collide_check(&Rect::new(5.0, 5.0, 2.0, 2.0)));
    }

    #[test]
    fn placed_group_add_and_remove() {
        let mut area = Area::new("field", StaticMap::default());
        let id = EntityId::new();
        area.add(id);
        area.add(id);
        assert_eq!(area.placed(), &[id]);
        assert!(area.remove(id));
        assert!(!area.remove(id));
        assert!(!area.contains(id));
    }

    #[test]
    fn parses_json_map() {
        let json = r#"{"objects": [
            {"type": "SolidCollision", "x": 1, "y": 2, "width": 3, "height": 4},
            {"type": "Door", "x": 0, "y": 0, "width": 1, "height": 1, "name": "to_town"}
        ]}"#;
        let map: MapData = serde_json::from_str(json).unwrap();
        assert_eq!(map.objects[0].rect(), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(map.objects[1].name.as_deref(), Some("to_town"));
    }

    #[test]
    fn missing_map_file_is_an_io_error() {
        let mut area = Area::new("void", JsonMapFile::new("/nonexistent/redpanda/map.json"));
        assert!(matches!(area.enter(), Err(AreaError::Io(..))));
        assert!(!area.is_loaded());
    }

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl AreaRenderer for Recorder {
        fn center(&mut self, camera_center: Vec2) {
            self.0.lock().unwrap().push(format!("center {camera_center}"));
        }

        fn draw(&mut self, placed: &[EntityId]) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(format!("draw {}", placed.len()));
            Ok(())
        }
    }

    #[test]
    fn render_centers_then_draws() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut area = Area::new("field", single_wall()).with_renderer(Recorder(log.clone()));
        assert!(matches!(
            area.render(Vec2::ZERO),
            Err(AreaError::NotLoaded(_))
        ));

        area.enter().unwrap();
        area.add(EntityId::new());
        area.render(Vec2::new(1.0, 2.0)).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["center [1, 2]", "draw 1"]);
    }

    #[test]
    fn render_without_renderer_fails() {
        let mut area = Area::new("field", single_wall());
        area.enter().unwrap();
        assert!(matches!(
            area.render(Vec2::ZERO),
            Err(AreaError::NoRenderer(_))
        ));
    }
}
