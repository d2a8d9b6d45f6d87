//! A point cloud on the unit sphere.

use std::sync::Arc;

use glprimer_core::geometry::sphere_point_cloud;

use crate::{
    abs::{DrawMode, GlError, Mesh},
    lessons::LessonSettings,
    scene::Scene,
};

pub fn sphere(gl: &Arc<glow::Context>, settings: &LessonSettings) -> Result<Scene, GlError> {
    let points = sphere_point_cloud(settings.point_count, settings.seed);
    let program = shader_program!(gl, "point_cloud")?;
    let mesh = Mesh::new(gl, DrawMode::Points)
        .with_usage(settings.buffer_usage)
        .with_attribute("position", 3, &points)?;
    Scene::new(gl, "point-cloud", program, mesh)
}
