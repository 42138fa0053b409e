//! Per-body draw parameters and GPU instance data

use bytemuck::{Pod, Zeroable};
use glam::DVec2;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::sim::body::{Body, Rgb};
use crate::sim::camera::Camera;
use crate::sim::world::BodyId;

/// Screen-space description of one visible body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    /// Index of the body in the world
    pub id: BodyId,
    pub screen_pos: DVec2,
    pub screen_radius: f64,
    pub color: Rgb,
}

impl DrawParams {
    fn for_body(id: BodyId, body: &Body, camera: &Camera) -> Self {
        Self {
            id,
            screen_pos: camera.world_to_screen(body.pos),
            screen_radius: camera.screen_radius(body.radius),
            color: body.color,
        }
    }

    /// Smaller than a pixel: plot a single point instead of a circle
    pub fn is_subpixel(&self) -> bool {
        self.screen_radius < 1.0
    }

    /// Integer pixel holding the center
    pub fn pixel(&self) -> (i32, i32) {
        (self.screen_pos.x as i32, self.screen_pos.y as i32)
    }

    pub fn to_instance(&self) -> CircleInstance {
        CircleInstance {
            center: self.screen_pos.as_vec2().to_array(),
            radius: self.screen_radius.max(1.0) as f32,
            _pad: 0.0,
            color: self.color.to_rgba_f32(),
        }
    }
}

/// One filled circle, laid out for an instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

/// Draw parameters for every body on a `screen_size` viewport
///
/// Output keeps the input body order.
pub fn query_visible(bodies: &[Body], camera: &Camera, screen_size: DVec2) -> Vec<DrawParams> {
    let visible = |(id, body): (BodyId, &Body)| {
        camera
            .is_visible(body.pos, body.radius, screen_size)
            .then(|| DrawParams::for_body(id, body, camera))
    };

    #[cfg(feature = "parallel")]
    {
        bodies.par_iter().enumerate().filter_map(visible).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        bodies.iter().enumerate().filter_map(visible).collect()
    }
}

/// Instance data for a batch of draw parameters
pub fn instances(params: &[DrawParams]) -> Vec<CircleInstance> {
    params.iter().map(DrawParams::to_instance).collect()
}
