//! The colored cube shared by the spinning, perspective and camera lessons.

use std::sync::Arc;

use glprimer_core::geometry::{CUBE_POSITIONS, cube_face_colors};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    abs::{DrawMode, GlError, Mesh},
    lessons::LessonSettings,
    scene::Scene,
};

/// A unit cube with one random color per face, drawn with the model
/// matrix the lesson sets.
pub fn colored(
    gl: &Arc<glow::Context>,
    name: &'static str,
    settings: &LessonSettings,
) -> Result<Scene, GlError> {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let program = shader_program!(gl, "vertex_color")?;
    let mesh = Mesh::new(gl, DrawMode::Triangles)
        .with_usage(settings.buffer_usage)
        .with_attribute("position", 3, &CUBE_POSITIONS)?
        .with_attribute("color", 3, &cube_face_colors(&mut rng))?;
    Scene::new(gl, name, program, mesh)
}
