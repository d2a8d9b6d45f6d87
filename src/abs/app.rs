//! SDL2 window and OpenGL ES context acquisition.
//!
//! This module defines the [`App`] struct which owns the window, the GL
//! context and the event pump for the lifetime of a lesson.

use std::sync::Arc;

use glow::HasContext;
use sdl2::video::{FullscreenType, GLProfile, SwapInterval};

use crate::{abs::GlError, config::WindowConfig};

/// The [`App`] struct encapsulates the SDL2 and OpenGL ES context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Opens a window with an OpenGL ES 2.0 context.
    ///
    /// There is no fallback: if the platform cannot provide ES 2.0 the
    /// error is returned and the caller is expected to give up. The width
    /// and height are ignored when `fullscreen` is set.
    pub fn new(config: &WindowConfig, vsync: bool) -> Result<Self, GlError> {
        let sdl = sdl2::init().map_err(GlError::Platform)?;
        let video_subsystem = sdl.video().map_err(GlError::Platform)?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(GLProfile::GLES);
        gl_attr.set_context_version(2, 0);
        gl_attr.set_depth_size(24);
        gl_attr.set_double_buffer(true);

        let (width, height) = if config.fullscreen {
            let mode = video_subsystem
                .current_display_mode(0)
                .map_err(GlError::Platform)?;
            (mode.w as u32, mode.h as u32)
        } else {
            (config.width, config.height)
        };

        let mut window = video_subsystem
            .window(&config.title, width, height)
            .opengl()
            .resizable()
            .build()
            .map_err(|e| GlError::Platform(e.to_string()))?;
        if config.fullscreen {
            window
                .set_fullscreen(FullscreenType::Desktop)
                .map_err(GlError::Platform)?;
        }

        let gl_context = window
            .gl_create_context()
            .map_err(GlError::ContextUnsupported)?;
        window
            .gl_make_current(&gl_context)
            .map_err(GlError::ContextUnsupported)?;

        let interval = if vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        if let Err(e) = video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("could not set swap interval: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        unsafe {
            log::info!(
                "GL context: {} / {} / {}",
                gl.get_parameter_string(glow::VENDOR),
                gl.get_parameter_string(glow::RENDERER),
                gl.get_parameter_string(glow::VERSION),
            );
        }

        let event_pump = sdl.event_pump().map_err(GlError::Platform)?;

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl: Arc::new(gl),
            event_pump,
        })
    }

    /// Size of the drawable area in pixels.
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }

    pub fn aspect(&self) -> f32 {
        let (width, height) = self.drawable_size();
        width as f32 / height.max(1) as f32
    }
}
