//! The per-scene context.
//!
//! A [`Scene`] owns everything one lesson renders with: the program, the
//! mesh, the transform state and an optional texture. It is built once,
//! advanced and drawn once per frame, and torn down with [`Scene::dispose`].

use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use glow::HasContext;
use glprimer_core::{Perspective, Spin, Transforms};

use crate::abs::{GlError, Mesh, PendingTexture, ShaderProgram, TextureState};

/// Uniform names shared by all lesson shaders.
pub mod uniforms {
    pub const MATRIX: &str = "matrix";
    pub const NORMAL_MATRIX: &str = "normalMatrix";
    pub const TEXTURE: &str = "textureID";
    pub const TIME: &str = "uTime";
}

/// Frames slower than this are logged.
const STALL_SECONDS: f32 = 0.25;

/// Timing of the frame being produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Number of frames produced before this one.
    pub frame: u64,
    /// Seconds since the loop started.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}

impl FrameContext {
    /// Whether the gap since the previous frame was long enough to show as
    /// a hitch in the animation.
    pub fn is_stalled(&self) -> bool {
        self.delta > STALL_SECONDS
    }
}

pub struct Scene {
    name: &'static str,
    gl: Arc<glow::Context>,
    program: ShaderProgram,
    mesh: Mesh,
    transforms: Transforms,
    perspective: Option<Perspective>,
    spin: Spin,
    texture: Option<PendingTexture>,
    clear_color: Vec4,
    time: f32,
}

impl Scene {
    /// Creates a scene drawing `mesh` with `program`.
    ///
    /// Fails if a buffer of the mesh does not match the attribute the
    /// program declares for it.
    pub fn new(
        gl: &Arc<glow::Context>,
        name: &'static str,
        program: ShaderProgram,
        mesh: Mesh,
    ) -> Result<Self, GlError> {
        mesh.check_against(&program)?;
        log::info!(
            "scene `{name}`: {} vertices as {:?}",
            mesh.vertex_count(),
            mesh.draw_mode()
        );
        Ok(Self {
            name,
            gl: Arc::clone(gl),
            program,
            mesh,
            transforms: Transforms::default(),
            perspective: None,
            spin: Spin::new(),
            texture: None,
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            time: 0.0,
        })
    }

    /// Projects through `perspective` at the given aspect ratio. Scenes
    /// without one draw in clip space directly.
    pub fn with_perspective(mut self, perspective: Perspective, aspect: f32) -> Self {
        self.transforms.projection = perspective.matrix(aspect);
        self.perspective = Some(perspective);
        self
    }

    pub fn with_camera(mut self, position: Vec3) -> Self {
        self.transforms.set_camera(position);
        self
    }

    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = spin;
        self
    }

    /// Samples `texture` on unit 0.
    pub fn with_texture(mut self, texture: PendingTexture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_clear_color(mut self, color: Vec4) -> Self {
        self.clear_color = color;
        self
    }

    /// Replaces the starting model matrix.
    pub fn with_model(mut self, model: Mat4) -> Self {
        self.transforms.model = model;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn texture_state(&self) -> Option<TextureState> {
        self.texture.as_ref().map(PendingTexture::state)
    }

    /// Updates the viewport and, for perspective scenes, the projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        let height = height.max(1);
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
        if let Some(perspective) = self.perspective {
            self.transforms.projection = perspective.matrix(width as f32 / height as f32);
        }
        log::debug!("scene `{}` resized to {width}x{height}", self.name);
    }

    /// Advances the scene by one frame.
    pub fn update(&mut self, frame: &FrameContext) {
        if frame.is_stalled() {
            log::debug!(
                "`{}` frame {} came {:.3}s after the previous one",
                self.name,
                frame.frame,
                frame.delta
            );
        }
        self.spin.apply(&mut self.transforms.model);
        self.transforms.update();
        self.time = frame.elapsed;
        if let Some(texture) = &mut self.texture {
            texture.poll();
        }
    }

    /// Pushes the uniforms and issues the draw call.
    pub fn render(&self) {
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.clear_color(
                self.clear_color.x,
                self.clear_color.y,
                self.clear_color.z,
                self.clear_color.w,
            );
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        self.program.use_program();
        self.program.set_uniform(uniforms::MATRIX, self.transforms.mvp());
        if self.program.has_uniform(uniforms::NORMAL_MATRIX) {
            self.program
                .set_uniform(uniforms::NORMAL_MATRIX, self.transforms.normal());
        }
        if self.program.has_uniform(uniforms::TIME) {
            self.program.set_uniform(uniforms::TIME, self.time);
        }
        if let Some(texture) = &self.texture {
            texture.bind(0);
            self.program.set_uniform(uniforms::TEXTURE, 0);
        }

        self.mesh.draw(&self.program);
    }

    /// Releases the scene's GL objects.
    pub fn dispose(self) {
        log::debug!("disposing scene `{}`", self.name);
        drop(self);
    }
}
