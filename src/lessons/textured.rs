//! Texturing and diffuse lighting on the unit cube.

use std::sync::Arc;

use glprimer_core::geometry::{CUBE_POSITIONS, cube_normals, cube_uvs};

use crate::{
    abs::{DrawMode, GlError, Mesh, PendingTexture},
    lessons::LessonSettings,
    scene::Scene,
};

/// Starts loading the configured image. With `wait_for_texture` set, the
/// decode finishes here and the first frame is already textured.
fn load_texture(
    gl: &Arc<glow::Context>,
    settings: &LessonSettings,
) -> Result<PendingTexture, GlError> {
    let mut texture = PendingTexture::load(gl, &settings.texture)?;
    if settings.wait_for_texture {
        texture.wait();
    }
    Ok(texture)
}

/// Position and uv, sampled from the configured image.
pub fn plain(gl: &Arc<glow::Context>, settings: &LessonSettings) -> Result<Scene, GlError> {
    let program = shader_program!(gl, "textured")?;
    let mesh = Mesh::new(gl, DrawMode::Triangles)
        .with_usage(settings.buffer_usage)
        .with_attribute("position", 3, &CUBE_POSITIONS)?
        .with_attribute("uv", 2, &cube_uvs())?;
    let texture = load_texture(gl, settings)?;
    Ok(Scene::new(gl, "textured-cube", program, mesh)?.with_texture(texture))
}

/// Adds normals; the vertex shader turns them with the normal matrix and
/// scales the texel by ambient plus diffuse light.
pub fn lit(gl: &Arc<glow::Context>, settings: &LessonSettings) -> Result<Scene, GlError> {
    let program = shader_program!(gl, "lit_textured")?;
    let mesh = Mesh::new(gl, DrawMode::Triangles)
        .with_usage(settings.buffer_usage)
        .with_attribute("position", 3, &CUBE_POSITIONS)?
        .with_attribute("uv", 2, &cube_uvs())?
        .with_attribute("normal", 3, &cube_normals())?;
    let texture = load_texture(gl, settings)?;
    Ok(Scene::new(gl, "lit-cube", program, mesh)?.with_texture(texture))
}
