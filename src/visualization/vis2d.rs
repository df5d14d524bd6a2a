use std::collections::HashMap;

use bevy::log::LogPlugin;
use bevy::math::primitives::{Annulus, Circle};
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::PrimaryWindow;

use crate::simulation::body::{CelestialBody, PlanetId};
use crate::simulation::scenario::Scenario;
use crate::simulation::units::NVec2;

#[derive(Component)]
struct PlanetTag(PlanetId);

#[derive(Component)]
struct RingTag(PlanetId);

/// Entities drawn for each live planet: (body, ring)
#[derive(Resource, Default)]
struct Drawn(HashMap<PlanetId, (Entity, Entity)>);

/// Shared material handles
#[derive(Resource)]
struct Palette {
    planets: Vec<Handle<ColorMaterial>>,
    ring: Handle<ColorMaterial>,
}

const RING_WIDTH: f32 = 1.0;

pub fn run_2d(scenario: Scenario) {
    log::info!(
        "run_2d: starting Bevy 2D viewer with {} planets",
        scenario.world.planets().len()
    );

    let window = Window {
        title: "Solar System".into(),
        resolution: (scenario.display.width as f32, scenario.display.height as f32).into(),
        ..Default::default()
    };

    App::new()
        .insert_resource(scenario)
        .init_resource::<Drawn>()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(window),
                    ..Default::default()
                })
                // env_logger owns the global logger
                .disable::<LogPlugin>(),
        )
        .add_systems(Startup, setup_system)
        .add_systems(
            Update,
            (input_system, physics_step_system, sync_planets_system).chain(),
        )
        .run();
}

/// Display point (origin top-left, y down) -> Bevy world (origin center, y up)
fn to_screen(p: NVec2, window: &Window) -> Vec2 {
    Vec2::new(
        p.x as f32 - 0.5 * window.width(),
        0.5 * window.height() - p.y as f32,
    )
}

fn setup_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn(Camera2dBundle::default());

    let planets = [
        Color::srgb(0.45, 0.65, 1.0),
        Color::srgb(0.85, 0.45, 0.30),
        Color::srgb(0.40, 0.80, 0.50),
        Color::srgb(0.80, 0.75, 0.55),
        Color::srgb(0.70, 0.50, 0.90),
        Color::srgb(0.95, 0.85, 0.40),
        Color::srgb(0.55, 0.85, 0.90),
        Color::srgb(0.75, 0.75, 0.75),
    ]
    .into_iter()
    .map(|c| materials.add(ColorMaterial::from(c)))
    .collect();
    let ring = materials.add(ColorMaterial::from(Color::srgba(120.0 / 255.0, 120.0 / 255.0, 180.0 / 255.0, 160.0 / 255.0)));
    commands.insert_resource(Palette { planets, ring });

    let (Some(sun), Ok(window)) = (scenario.world.sun(), windows.get_single()) else {
        return;
    };
    let at = to_screen(sun.position(), window);
    commands.spawn(MaterialMesh2dBundle {
        mesh: Mesh2dHandle(meshes.add(Circle::new(sun.radius() as f32))),
        material: materials.add(ColorMaterial::from(Color::srgb(1.0, 0.9, 0.0))),
        transform: Transform::from_xyz(at.x, at.y, 1.0),
        ..Default::default()
    });
}

/// Left click spawns a planet under the cursor; Escape quits
fn input_system(
    mut scenario: ResMut<Scenario>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        scenario.world.shutdown();
        exit.send(AppExit::Success);
        return;
    }
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    if let Some(cursor) = window.cursor_position() {
        scenario
            .world
            .spawn_planet_at(NVec2::new(cursor.x as f64, cursor.y as f64));
    }
}

fn physics_step_system(mut scenario: ResMut<Scenario>, time: Res<Time>) {
    for report in scenario.advance(time.delta_seconds_f64()) {
        if !report.is_empty() {
            log::info!(
                "{} planets removed ({} into the sun, {} collisions)",
                report.removed(),
                report.fell_into_sun.len(),
                report.collided.len()
            );
        }
    }
}

/// Mirror the live planet set into entities: spawn new, move existing,
/// rebuild rings whose radius changed, despawn the dead
fn sync_planets_system(
    mut commands: Commands,
    mut scenario: ResMut<Scenario>,
    mut drawn: ResMut<Drawn>,
    palette: Res<Palette>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut bodies: Query<&mut Transform, (With<PlanetTag>, Without<RingTag>)>,
    mut rings: Query<(&mut Transform, &mut Mesh2dHandle), (With<RingTag>, Without<PlanetTag>)>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    let live: Vec<PlanetId> = scenario.world.planets().iter().map(|p| p.id()).collect();
    drawn.0.retain(|id, (body, ring)| {
        let keep = live.contains(id);
        if !keep {
            commands.entity(*body).despawn();
            commands.entity(*ring).despawn();
        }
        keep
    });

    for planet in scenario.world.planets_mut() {
        let id = planet.id();
        let at = to_screen(planet.position(), window);
        let rotation = Quat::from_rotation_z(-(planet.angle() as f32));
        let ring_dirty = planet.ring_mut().take_dirty();
        let ring = planet.ring();
        let ring_at = to_screen(ring.center, window);

        let ring_mesh = || {
            let r = ring.radius as f32;
            Annulus::new((r - 0.5 * RING_WIDTH).max(0.0), r + 0.5 * RING_WIDTH)
                .mesh()
                .resolution(ring.point_count())
        };

        let existing = drawn.0.get(&id).copied();
        match existing {
            Some((body, ring_entity)) => {
                if let Ok(mut t) = bodies.get_mut(body) {
                    t.translation = at.extend(2.0);
                    t.rotation = rotation;
                }
                if let Ok((mut t, mut mesh)) = rings.get_mut(ring_entity) {
                    t.translation = ring_at.extend(0.0);
                    if ring_dirty {
                        *mesh = Mesh2dHandle(meshes.add(ring_mesh()));
                    }
                }
            }
            None => {
                let material = palette.planets[id.0 as usize % palette.planets.len()].clone();
                let body = commands
                    .spawn((
                        MaterialMesh2dBundle {
                            mesh: Mesh2dHandle(meshes.add(Circle::new(planet.radius() as f32))),
                            material,
                            transform: Transform::from_translation(at.extend(2.0)).with_rotation(rotation),
                            ..Default::default()
                        },
                        PlanetTag(id),
                    ))
                    .id();
                let ring_entity = commands
                    .spawn((
                        MaterialMesh2dBundle {
                            mesh: Mesh2dHandle(meshes.add(ring_mesh())),
                            material: palette.ring.clone(),
                            transform: Transform::from_translation(ring_at.extend(0.0)),
                            ..Default::default()
                        },
                        RingTag(id),
                    ))
                    .id();
                drawn.0.insert(id, (body, ring_entity));
            }
        }
    }
}
