//! A plane rippled in the vertex shader.

use std::sync::Arc;

use glprimer_core::geometry::plane_grid;

use crate::{
    abs::{DrawMode, GlError, Mesh},
    lessons::LessonSettings,
    scene::Scene,
};

pub fn plane(gl: &Arc<glow::Context>, settings: &LessonSettings) -> Result<Scene, GlError> {
    let program = shader_program!(gl, "wave")?;
    let mesh = Mesh::new(gl, DrawMode::Triangles)
        .with_usage(settings.buffer_usage)
        .with_attribute("position", 3, &plane_grid(10.0, 10.0, 100, 100))?;
    Scene::new(gl, "wave", program, mesh)
}
