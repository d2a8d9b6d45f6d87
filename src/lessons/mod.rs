//! The lesson catalogue.
//!
//! Each lesson configures a [`Scene`] with its own geometry, shaders and
//! transforms. Lessons are picked by name (`lit-cube`) or by number (`11`).
//!
//! The submodules build the GL side of a lesson (program, buffers,
//! texture). Where the model sits, where the camera looks from, the
//! projection and the spin are plain values on [`Lesson`].

use std::{f32::consts::PI, fmt, path::PathBuf, str::FromStr, sync::Arc};

use glam::{Mat4, Vec3, Vec4};
use glprimer_core::{Axis, Perspective, Spin};
use thiserror::Error;

use crate::{
    abs::{BufferUsage, GlError},
    config::Config,
    scene::Scene,
};

/// Builds a [`crate::abs::ShaderProgram`] from `src/shaders/<name>/{vert,frag}.glsl`.
macro_rules! shader_program {
    ($gl:expr, $name:literal) => {
        $crate::abs::ShaderProgram::from_sources(
            $gl,
            include_str!(concat!("../shaders/", $name, "/vert.glsl")),
            include_str!(concat!("../shaders/", $name, "/frag.glsl")),
        )
    };
}

mod cube;
mod points;
mod textured;
mod triangle;
mod wave;

/// #151B26
const WAVE_BACKGROUND: Vec4 = Vec4::new(21.0 / 255.0, 27.0 / 255.0, 38.0 / 255.0, 1.0);

/// Inputs a lesson may need besides the GL context.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonSettings {
    /// Width over height of the drawable area.
    pub aspect: f32,
    pub texture: PathBuf,
    pub wait_for_texture: bool,
    pub buffer_usage: BufferUsage,
    pub point_count: usize,
    pub seed: u64,
}

impl LessonSettings {
    pub fn from_config(config: &Config, aspect: f32, seed: u64) -> Self {
        Self {
            aspect,
            texture: config.texture.clone(),
            wait_for_texture: config.wait_for_texture,
            buffer_usage: config.buffer_usage,
            point_count: config.point_count,
            seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lesson {
    Triangle,
    ColorTriangle,
    SpinningCube,
    PerspectiveCube,
    CameraCube,
    PointCloud,
    TexturedCube,
    LitCube,
    Wave,
}

impl Lesson {
    pub const ALL: [Lesson; 9] = [
        Lesson::Triangle,
        Lesson::ColorTriangle,
        Lesson::SpinningCube,
        Lesson::PerspectiveCube,
        Lesson::CameraCube,
        Lesson::PointCloud,
        Lesson::TexturedCube,
        Lesson::LitCube,
        Lesson::Wave,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Lesson::Triangle => "triangle",
            Lesson::ColorTriangle => "color-triangle",
            Lesson::SpinningCube => "spinning-cube",
            Lesson::PerspectiveCube => "perspective-cube",
            Lesson::CameraCube => "camera-cube",
            Lesson::PointCloud => "point-cloud",
            Lesson::TexturedCube => "textured-cube",
            Lesson::LitCube => "lit-cube",
            Lesson::Wave => "wave",
        }
    }

    /// The tutorial's lesson number, if the lesson had one.
    pub fn number(self) -> Option<u32> {
        match self {
            Lesson::Triangle => Some(3),
            Lesson::ColorTriangle => Some(4),
            Lesson::SpinningCube => Some(6),
            Lesson::PerspectiveCube => Some(7),
            Lesson::CameraCube => Some(8),
            Lesson::PointCloud => Some(9),
            Lesson::TexturedCube => Some(10),
            Lesson::LitCube => Some(11),
            Lesson::Wave => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Lesson::Triangle => "one solid red triangle",
            Lesson::ColorTriangle => "per-vertex colors interpolated across a triangle",
            Lesson::SpinningCube => "a cube spinning in clip space, one random color per face",
            Lesson::PerspectiveCube => "the spinning cube seen through a perspective projection",
            Lesson::CameraCube => "model and view matrices with a camera off to the side",
            Lesson::PointCloud => "points scattered on a sphere, drawn as GL_POINTS",
            Lesson::TexturedCube => "a cube sampling an image texture",
            Lesson::LitCube => "the textured cube with a normal matrix and diffuse light",
            Lesson::Wave => "a plane displaced by a time-driven sine wave",
        }
    }

    /// Initial model matrix.
    pub fn model(self) -> Mat4 {
        match self {
            Lesson::SpinningCube => {
                Mat4::from_translation(Vec3::new(0.2, 0.5, 0.0))
                    * Mat4::from_scale(Vec3::new(0.25, 0.25, 1.0))
            }
            Lesson::PerspectiveCube => Mat4::from_translation(Vec3::new(0.2, 0.5, -2.0)),
            Lesson::CameraCube => Mat4::from_translation(Vec3::new(-1.5, 0.0, -2.0)),
            _ => Mat4::IDENTITY,
        }
    }

    /// Camera position, if the lesson has a view matrix.
    pub fn camera(self) -> Option<Vec3> {
        match self {
            Lesson::CameraCube => Some(Vec3::new(-3.0, 0.0, 1.0)),
            Lesson::PointCloud | Lesson::TexturedCube | Lesson::LitCube => {
                Some(Vec3::new(0.0, 0.1, 2.0))
            }
            Lesson::Wave => Some(Vec3::new(0.0, 0.0, 15.0)),
            _ => None,
        }
    }

    /// Projection, if the lesson leaves clip space.
    pub fn perspective(self) -> Option<Perspective> {
        match self {
            Lesson::Triangle | Lesson::ColorTriangle | Lesson::SpinningCube => None,
            Lesson::Wave => Some(Perspective::new(70.0, 1e-3, 1e3)),
            _ => Some(Perspective::STANDARD),
        }
    }

    /// Rotation applied to the model every frame.
    pub fn spin(self) -> Spin {
        match self {
            Lesson::SpinningCube => Spin::new()
                .then(Axis::Z, PI / 140.0)
                .then(Axis::X, PI / 140.0)
                .then(Axis::Y, -PI / 100.0),
            Lesson::PerspectiveCube => Spin::new()
                .then(Axis::Z, PI / 140.0)
                .then(Axis::X, PI / 140.0),
            Lesson::CameraCube => Spin::new().then(Axis::Y, -PI / 100.0),
            Lesson::PointCloud => Spin::new().then(Axis::Y, 0.015),
            Lesson::TexturedCube => Spin::new()
                .then(Axis::X, PI / 140.0)
                .then(Axis::Y, PI / 140.0),
            Lesson::LitCube => Spin::new()
                .then(Axis::X, PI / 100.0)
                .then(Axis::Y, PI / 200.0),
            Lesson::Triangle | Lesson::ColorTriangle | Lesson::Wave => Spin::new(),
        }
    }

    pub fn clear_color(self) -> Vec4 {
        match self {
            Lesson::Wave => WAVE_BACKGROUND,
            _ => Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    /// Builds the lesson's scene and places it.
    pub fn build(
        self,
        gl: &Arc<glow::Context>,
        settings: &LessonSettings,
    ) -> Result<Scene, GlError> {
        log::info!("building lesson `{self}`: {}", self.description());
        let scene = match self {
            Lesson::Triangle => triangle::solid(gl, settings),
            Lesson::ColorTriangle => triangle::colored(gl, settings),
            Lesson::SpinningCube => cube::colored(gl, "spinning-cube", settings),
            Lesson::PerspectiveCube => cube::colored(gl, "perspective-cube", settings),
            Lesson::CameraCube => cube::colored(gl, "camera-cube", settings),
            Lesson::PointCloud => points::sphere(gl, settings),
            Lesson::TexturedCube => textured::plain(gl, settings),
            Lesson::LitCube => textured::lit(gl, settings),
            Lesson::Wave => wave::plane(gl, settings),
        }?;

        let mut scene = scene
            .with_model(self.model())
            .with_spin(self.spin())
            .with_clear_color(self.clear_color());
        if let Some(camera) = self.camera() {
            scene = scene.with_camera(camera);
        }
        if let Some(perspective) = self.perspective() {
            scene = scene.with_perspective(perspective, settings.aspect);
        }
        Ok(scene)
    }
}

impl fmt::Display for Lesson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown lesson `{0}`, run with --list to see the lessons")]
pub struct UnknownLesson(pub String);

impl FromStr for Lesson {
    type Err = UnknownLesson;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        if let Ok(number) = wanted.parse::<u32>() {
            return Lesson::ALL
                .into_iter()
                .find(|lesson| lesson.number() == Some(number))
                .ok_or_else(|| UnknownLesson(s.to_string()));
        }
        Lesson::ALL
            .into_iter()
            .find(|lesson| lesson.name() == wanted)
            .ok_or_else(|| UnknownLesson(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use glprimer_core::Transforms;

    use super::*;

    #[test]
    fn test_parse_by_name() {
        assert_eq!("lit-cube".parse::<Lesson>(), Ok(Lesson::LitCube));
        assert_eq!("Point_Cloud".parse::<Lesson>(), Ok(Lesson::PointCloud));
        assert_eq!(" wave ".parse::<Lesson>(), Ok(Lesson::Wave));
    }

    #[test]
    fn test_parse_by_number() {
        assert_eq!("3".parse::<Lesson>(), Ok(Lesson::Triangle));
        assert_eq!("9".parse::<Lesson>(), Ok(Lesson::PointCloud));
        assert_eq!("11".parse::<Lesson>(), Ok(Lesson::LitCube));
        assert_eq!("5".parse::<Lesson>(), Err(UnknownLesson("5".into())));
    }

    #[test]
    fn test_unknown_lesson() {
        let err = "teapot".parse::<Lesson>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown lesson `teapot`, run with --list to see the lessons"
        );
    }

    #[test]
    fn test_names_round_trip() {
        for lesson in Lesson::ALL {
            assert_eq!(lesson.to_string().parse::<Lesson>(), Ok(lesson));
        }
    }

    #[test]
    fn test_settings_from_config() {
        let config = Config {
            wait_for_texture: true,
            buffer_usage: BufferUsage::Dynamic,
            ..Config::default()
        };
        let settings = LessonSettings::from_config(&config, 4.0 / 3.0, 9);
        assert_eq!(settings.point_count, 100_000);
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.texture, config.texture);
        assert!(settings.wait_for_texture);
        assert_eq!(settings.buffer_usage, BufferUsage::Dynamic);
    }

    #[test]
    fn test_cube_spins() {
        assert_eq!(
            Lesson::SpinningCube.spin().steps(),
            &[
                (Axis::Z, PI / 140.0),
                (Axis::X, PI / 140.0),
                (Axis::Y, -PI / 100.0)
            ]
        );
        assert_eq!(
            Lesson::PerspectiveCube.spin().steps(),
            &[(Axis::Z, PI / 140.0), (Axis::X, PI / 140.0)]
        );
        assert_eq!(Lesson::CameraCube.spin().steps(), &[(Axis::Y, -PI / 100.0)]);
    }

    #[test]
    fn test_textured_and_point_spins() {
        assert_eq!(Lesson::PointCloud.spin().steps(), &[(Axis::Y, 0.015)]);
        assert_eq!(
            Lesson::TexturedCube.spin().steps(),
            &[(Axis::X, PI / 140.0), (Axis::Y, PI / 140.0)]
        );
        assert_eq!(
            Lesson::LitCube.spin().steps(),
            &[(Axis::X, PI / 100.0), (Axis::Y, PI / 200.0)]
        );
        for lesson in [Lesson::Triangle, Lesson::ColorTriangle, Lesson::Wave] {
            assert!(lesson.spin().is_still(), "{lesson} should not spin");
        }
    }

    #[test]
    fn test_model_placement() {
        // T(.2,.5,0) S(.25,.25,1) sends the cube corner (.5,.5,.5) to (.325,.625,.5)
        let corner = Lesson::SpinningCube
            .model()
            .transform_point3(Vec3::new(0.5, 0.5, 0.5));
        assert!(corner.abs_diff_eq(Vec3::new(0.325, 0.625, 0.5), 1e-6));
        assert_eq!(
            Lesson::PerspectiveCube.model().w_axis.truncate(),
            Vec3::new(0.2, 0.5, -2.0)
        );
        assert_eq!(
            Lesson::CameraCube.model().w_axis.truncate(),
            Vec3::new(-1.5, 0.0, -2.0)
        );
        assert_eq!(Lesson::LitCube.model(), Mat4::IDENTITY);
    }

    #[test]
    fn test_cameras() {
        assert_eq!(Lesson::CameraCube.camera(), Some(Vec3::new(-3.0, 0.0, 1.0)));
        for lesson in [Lesson::PointCloud, Lesson::TexturedCube, Lesson::LitCube] {
            assert_eq!(lesson.camera(), Some(Vec3::new(0.0, 0.1, 2.0)));
        }
        assert_eq!(Lesson::Wave.camera(), Some(Vec3::new(0.0, 0.0, 15.0)));
        assert_eq!(Lesson::PerspectiveCube.camera(), None);
        assert_eq!(Lesson::Triangle.camera(), None);
    }

    #[test]
    fn test_projections() {
        for lesson in [Lesson::Triangle, Lesson::ColorTriangle, Lesson::SpinningCube] {
            assert_eq!(lesson.perspective(), None);
        }
        for lesson in [
            Lesson::PerspectiveCube,
            Lesson::CameraCube,
            Lesson::PointCloud,
            Lesson::TexturedCube,
            Lesson::LitCube,
        ] {
            assert_eq!(lesson.perspective(), Some(Perspective::new(75.0, 1e-4, 1e4)));
        }
        assert_eq!(
            Lesson::Wave.perspective(),
            Some(Perspective::new(70.0, 1e-3, 1e3))
        );
    }

    #[test]
    fn test_wave_background() {
        let expected = Vec4::new(0x15 as f32, 0x1B as f32, 0x26 as f32, 255.0) / 255.0;
        assert!(Lesson::Wave.clear_color().abs_diff_eq(expected, 1e-6));
        assert_eq!(Lesson::LitCube.clear_color(), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_camera_cube_first_frame() {
        let lesson = Lesson::CameraCube;
        let projection = Perspective::STANDARD.matrix(4.0 / 3.0);
        let mut transforms = Transforms::new(projection);
        transforms.model = lesson.model();
        transforms.set_camera(Vec3::new(-3.0, 0.0, 1.0));
        lesson.spin().apply(&mut transforms.model);
        transforms.update();

        let expected = projection
            * Mat4::from_translation(Vec3::new(-3.0, 0.0, 1.0)).inverse()
            * Mat4::from_translation(Vec3::new(-1.5, 0.0, -2.0))
            * Mat4::from_rotation_y(-PI / 100.0);
        assert!(transforms.mvp().abs_diff_eq(expected, 1e-5));
    }
}
