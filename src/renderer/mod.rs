//! CPU tessellation for the render collaborator
//!
//! Turns the background and the entity draw list into one triangle list,
//! painted back to front: regions first, then shapes in z-order.

pub mod shapes;
pub mod vertex;

pub use vertex::{Vertex, as_floats, hsb_to_rgba};

use crate::sim::World;

/// Background regions only (redrawn when the layout changes)
pub fn background_vertices(world: &World) -> Vec<Vertex> {
    world.regions().iter().flat_map(shapes::region).collect()
}

/// Shapes only, in draw order
pub fn entity_vertices(world: &World) -> Vec<Vertex> {
    world
        .render_hints()
        .iter()
        .flat_map(shapes::entity)
        .collect()
}

/// Complete frame: background then shapes
pub fn scene_vertices(world: &World) -> Vec<Vertex> {
    let mut vertices = background_vertices(world);
    vertices.extend(entity_vertices(world));
    vertices
}
