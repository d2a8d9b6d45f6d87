//! The first two lessons: a single triangle, drawn straight in clip space.

use std::sync::Arc;

use glprimer_core::geometry::{TRIANGLE_COLORS, TRIANGLE_POSITIONS};

use crate::{
    abs::{DrawMode, GlError, Mesh},
    lessons::LessonSettings,
    scene::Scene,
};

/// Positions only, the fragment shader paints everything red.
pub fn solid(gl: &Arc<glow::Context>, settings: &LessonSettings) -> Result<Scene, GlError> {
    let program = shader_program!(gl, "solid")?;
    let mesh = Mesh::new(gl, DrawMode::Triangles)
        .with_usage(settings.buffer_usage)
        .with_attribute("position", 3, &TRIANGLE_POSITIONS)?;
    Scene::new(gl, "triangle", program, mesh)
}

/// Adds a color attribute, interpolated between the corners.
pub fn colored(gl: &Arc<glow::Context>, settings: &LessonSettings) -> Result<Scene, GlError> {
    let program = shader_program!(gl, "vertex_color")?;
    let mesh = Mesh::new(gl, DrawMode::Triangles)
        .with_usage(settings.buffer_usage)
        .with_attribute("position", 3, &TRIANGLE_POSITIONS)?
        .with_attribute("color", 3, &TRIANGLE_COLORS)?;
    Scene::new(gl, "color-triangle", program, mesh)
}
