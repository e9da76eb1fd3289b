//! Synthetic scene: a terrain sheet plus a swarm of spheres

use osp_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DemoConfig;

/// Fraction of the root half-extent bodies are kept within
const ARENA_FILL: f32 = 0.9;

/// Build the terrain (entity 0) and the sphere bodies (entities 1..)
pub fn build_scene(config: &DemoConfig) -> Vec<Body> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let arena = arena_half_extent(config);

    let mut bodies = Vec::with_capacity(config.body_count as usize + 1);
    bodies.push(terrain(config, arena));

    for id in 1..=config.body_count {
        let center = Vec3::new(
            rng.gen_range(-arena..arena),
            rng.gen_range(-arena..arena),
            rng.gen_range(-arena..arena),
        );
        let sphere = BoundingSphere::new(center, config.body_radius);
        let state = if rng.gen::<f32>() < config.resting_fraction {
            KinematicState::at_rest(center)
        } else {
            let speed = config.max_speed;
            KinematicState::moving(
                center,
                Vec3::new(
                    rng.gen_range(-speed..=speed),
                    rng.gen_range(-speed..=speed),
                    rng.gen_range(-speed..=speed),
                ),
            )
        };
        bodies.push(Body::new(Entity::new(id), Geometry::from_spheres(vec![sphere]), state));
    }

    log::info!(
        "Scene: {} terrain triangles, {} spheres",
        bodies[0].geometry().primitive_count(),
        config.body_count
    );
    bodies
}

/// Flat sheet of triangles a quarter of the way down the arena
fn terrain(config: &DemoConfig, arena: f32) -> Body {
    let resolution = config.terrain_resolution.max(1);
    let cell = 2.0 * arena / resolution as f32;
    let height = -arena * 0.5;

    let cells = resolution as usize;
    let mut triangles = Vec::with_capacity(cells * cells * 2);
    for row in 0..resolution {
        for col in 0..resolution {
            let x0 = -arena + col as f32 * cell;
            let z0 = -arena + row as f32 * cell;
            let a = Vec3::new(x0, height, z0);
            let b = Vec3::new(x0 + cell, height, z0);
            let c = Vec3::new(x0 + cell, height, z0 + cell);
            let d = Vec3::new(x0, height, z0 + cell);
            triangles.push(Triangle::new(a, b, c));
            triangles.push(Triangle::new(a, c, d));
        }
    }

    Body::new(
        Entity::new(0),
        Geometry::from_triangles(triangles),
        KinematicState::at_rest(Vec3::zeros()),
    )
}

fn arena_half_extent(config: &DemoConfig) -> f32 {
    config.osp.root_side * 0.5 * ARENA_FILL
}

/// Integrate every body and bounce moving ones off the arena walls
pub fn advance(bodies: &mut [Body], config: &DemoConfig) {
    let arena = arena_half_extent(config);
    for body in bodies.iter_mut() {
        body.advance(config.timestep);

        let position = body.kinematic_state().position;
        let state = body.kinematic_state_mut();
        for axis in 0..3 {
            if position[axis].abs() > arena && position[axis].signum() == state.velocity[axis].signum() {
                state.velocity[axis] = -state.velocity[axis];
            }
        }
    }
}

/// Count candidate pairs whose spheres actually touch
pub fn sphere_contacts(bodies: &[Body], pairs: &[CollisionPair]) -> usize {
    let spheres_of = |entity: Entity| {
        bodies
            .get(entity.id() as usize)
            .map_or(&[][..], |body| body.geometry().spheres.as_slice())
    };

    pairs
        .iter()
        .filter(|pair| {
            let a = spheres_of(pair.entity_a);
            let b = spheres_of(pair.entity_b);
            a.iter().any(|sa| b.iter().any(|sb| sa.intersects(sb)))
        })
        .count()
}
