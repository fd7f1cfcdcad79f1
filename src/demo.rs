//! A walker wandering a small walled meadow.
//!
//! The autopilot turns the player controller whenever its random timer
//! expires; the walker follows the controller and stops at walls.

use glam::Vec2;
use redpanda_core::{EntityId, Rect, Timer, TimerId, TimerRegistry};
use redpanda_ecs::components::{
    Animation, AnimationAction, Direction, Location, Movement, Speed, Sprite, Velocity,
};
use redpanda_ecs::stage::{EVENT, POST_UPDATE, PRE_UPDATE, STARTUP, UPDATE};
use redpanda_ecs::{
    keys, Area, AppBuilder, AreaRenderer, Controller, EcsError, MapData, MapObject, Plugin, Query,
    Renderable, Resources, StaticMap, SystemResult, Teardown, World, DOOR, SOLID_COLLISION,
};
use tracing::{debug, info};

pub const MEADOW: &str = "meadow";

/// Resource key of the autopilot's `TimerId`.
const TURN_TIMER: &str = "demo.turn_timer";

pub struct MeadowPlugin;

impl Plugin for MeadowPlugin {
    fn build(&self, app: &mut AppBuilder) -> Result<(), EcsError> {
        app.add_startup_system_to_stage(STARTUP, setup_meadow)?
            .add_system_to_stage(EVENT, autopilot)?
            .add_system_to_stage(PRE_UPDATE, steer)?
            .add_system_to_stage(UPDATE, walk)?
            .add_system_to_stage(POST_UPDATE, render)?;
        Ok(())
    }
}

fn meadow_map() -> MapData {
    let wall = |x, y, w, h| MapObject::new(SOLID_COLLISION, Rect::new(x, y, w, h));
    MapData {
        objects: vec![
            wall(0.0, 0.0, 320.0, 16.0),
            wall(0.0, 224.0, 320.0, 16.0),
            wall(0.0, 0.0, 16.0, 240.0),
            wall(304.0, 0.0, 16.0, 240.0),
            // rock
            wall(144.0, 96.0, 32.0, 32.0),
            MapObject::new(DOOR, Rect::new(152.0, 16.0, 16.0, 8.0)),
        ],
    }
}

/// Stands in for a real renderer: remembers where the camera is and logs
/// what would be drawn.
#[derive(Debug, Default)]
struct LogRenderer {
    camera: Vec2,
    frames: u64,
}

impl AreaRenderer for LogRenderer {
    fn center(&mut self, camera_center: Vec2) {
        self.camera = camera_center;
    }

    fn draw(&mut self, placed: &[EntityId]) -> anyhow::Result<()> {
        self.frames += 1;
        if self.frames % 60 == 0 {
            info!(
                "Frame {}: camera at {}, {} entities",
                self.frames,
                self.camera,
                placed.len()
            );
        }
        Ok(())
    }
}

fn setup_meadow(world: &mut World, resources: &mut Resources) -> SystemResult {
    let meadow = Area::new(MEADOW, StaticMap(meadow_map())).with_renderer(LogRenderer::default());
    world.add_area(meadow);
    world.enter_area(MEADOW)?;

    let walker = world.spawn((
        Location::new(MEADOW, Vec2::new(48.0, 48.0)),
        Sprite::new("walker", Vec2::new(16.0, 32.0)),
        Animation::new(AnimationAction::Idle),
        Direction::Right,
        Movement::default(),
        Velocity::default(),
        Speed(Vec2::splat(48.0)),
    ));
    world.place_in_current_area(walker)?;
    resources.insert(keys::CAMERA_TRACKING_ENTITY, walker);

    let turn = resources
        .get_mut::<TimerRegistry>(keys::TIMERS)?
        .create(Timer::random(1.0, 3.0));
    resources.insert(TURN_TIMER, turn);

    *resources.get_mut::<Controller>(&keys::controller(1))? = heading(Direction::Right);

    resources
        .get::<Teardown>(keys::TEARDOWN)?
        .register("meadow", || info!("Leaving the meadow"));
    info!("Walker {} entered the {}", walker, MEADOW);
    Ok(())
}

fn heading(direction: Direction) -> Controller {
    let mut controller = Controller::default();
    match direction {
        Direction::Up => controller.up = true,
        Direction::Down => controller.down = true,
        Direction::Left => controller.left = true,
        Direction::Right => controller.right = true,
    }
    controller
}

fn turn_clockwise(direction: Direction) -> Direction {
    match direction {
        Direction::Up => Direction::Right,
        Direction::Right => Direction::Down,
        Direction::Down => Direction::Left,
        Direction::Left => Direction::Up,
    }
}

fn controller_direction(controller: &Controller) -> Option<Direction> {
    if controller.up {
        Some(Direction::Up)
    } else if controller.down {
        Some(Direction::Down)
    } else if controller.left {
        Some(Direction::Left)
    } else if controller.right {
        Some(Direction::Right)
    } else {
        None
    }
}

/// Turn the player controller each time the turn timer expires.
fn autopilot(_world: &mut World, resources: &mut Resources) -> SystemResult {
    let turn = *resources.get::<TimerId>(TURN_TIMER)?;
    let timer = resources
        .get_mut::<TimerRegistry>(keys::TIMERS)?
        .timer_mut(turn)?;
    if !timer.expired {
        return Ok(());
    }
    timer.queue_reset = true;

    let controller = resources.get_mut::<Controller>(&keys::controller(1))?;
    let next = controller_direction(controller).map_or(Direction::Down, turn_clockwise);
    *controller = heading(next);
    debug!("Autopilot turned {:?}", next);
    Ok(())
}

/// Map the player controller onto movement, facing and animation.
fn steer(world: &mut World, resources: &mut Resources) -> SystemResult {
    let controller = *resources.get::<Controller>(&keys::controller(1))?;
    let direction = controller_direction(&controller);

    for entity in world.query_mut(&Query::of::<(Movement, Direction, Animation)>()) {
        entity.get_mut::<Movement>()?.0 = direction.map_or(Vec2::ZERO, Direction::vector);
        if let Some(direction) = direction {
            *entity.get_mut::<Direction>()? = direction;
        }
        entity.get_mut::<Animation>()?.action = if direction.is_some() {
            AnimationAction::Walking
        } else {
            AnimationAction::Idle
        };
    }
    Ok(())
}

/// Move everything with a velocity, refusing steps whose feet hit a wall.
fn walk(world: &mut World, resources: &mut Resources) -> SystemResult {
    let elapsed = *resources.get::<f32>(keys::TIME_ELAPSED)?;

    for id in world.query_ids(&Query::of::<(Movement, Speed, Velocity)>()) {
        let entity = world.entity_mut(id)?;
        let velocity = entity.get::<Movement>()?.0 * entity.get::<Speed>()?.0;
        entity.get_mut::<Velocity>()?.0 = velocity;
    }

    for id in world.query_ids(&Query::of::<(Location, Sprite, Velocity)>()) {
        let entity = world.entity(id)?;
        let velocity = entity.get::<Velocity>()?.0;
        if velocity == Vec2::ZERO {
            continue;
        }
        let target = entity.get::<Location>()?.position() + velocity * elapsed;
        let feet = Rect::from_position_size(target, entity.get::<Sprite>()?.frame_size).feet();

        if world.collide_check(&feet)? {
            debug!("{} blocked at {}", id, feet);
            world.entity_mut(id)?.get_mut::<Velocity>()?.0 = Vec2::ZERO;
        } else {
            world.entity_mut(id)?.get_mut::<Location>()?.set_position(target);
        }
    }
    Ok(())
}

/// Center the camera on the tracked entity and draw the current area.
fn render(world: &mut World, resources: &mut Resources) -> SystemResult {
    let tracked = *resources.get::<EntityId>(keys::CAMERA_TRACKING_ENTITY)?;
    let center = Renderable::from_entity(world.entity(tracked)?)?.rect().center();
    world.current_area_mut()?.render(center)?;
    Ok(())
}
