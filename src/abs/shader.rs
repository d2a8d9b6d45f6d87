//! OpenGL ES shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for building shader programs.
//! Compiling and linking both return a [`GlError`] carrying a [`ShaderDiagnostic`] on failure.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::{cell::RefCell, sync::Arc};

use fxhash::{FxHashMap, FxHashSet};
use glam::{Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;
use glprimer_core::{ShaderDiagnostic, ShaderStage};

use crate::abs::GlError;

fn gl_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// Represents an individual compiled shader stage.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<glow::Context>, stage: ShaderStage, source: &str) -> Result<Self, GlError> {
        unsafe {
            let shader = gl
                .create_shader(gl_stage(stage))
                .map_err(GlError::create("shader"))?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            let info_log = gl.get_shader_info_log(shader);
            if !gl.get_shader_compile_status(shader) {
                gl.delete_shader(shader);
                return Err(GlError::Compile(ShaderDiagnostic::compile(stage, info_log)));
            }
            if !info_log.trim().is_empty() {
                log::warn!("{stage} shader compiled with messages: {}", info_log.trim());
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Uploads the value to the given location of the program in use.
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for bool {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_1_i32(Some(location), *self as i32) }
    }
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_1_i32(Some(location), *self) }
    }
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_1_f32(Some(location), *self) }
    }
}

impl Uniform for Vec2 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_2_f32(Some(location), self.x, self.y) }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_3_f32(Some(location), self.x, self.y, self.z) }
    }
}

impl Uniform for Vec4 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_4_f32(Some(location), self.x, self.y, self.z, self.w) }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        // column-major, so no transpose
        unsafe { gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_ref()) }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// An active vertex attribute of a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveAttribute {
    pub location: u32,
    /// Float components per vertex the shader declares (`vec3` is 3).
    pub components: usize,
}

fn attribute_components(name: &str, gl_type: u32) -> Result<usize, GlError> {
    match gl_type {
        glow::FLOAT => Ok(1),
        glow::FLOAT_VEC2 => Ok(2),
        glow::FLOAT_VEC3 => Ok(3),
        glow::FLOAT_VEC4 => Ok(4),
        _ => Err(GlError::UnsupportedAttributeType {
            name: name.to_string(),
            gl_type,
        }),
    }
}

/// Represents a linked shader program with its attribute and uniform
/// locations resolved by name.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
    attributes: FxHashMap<String, ActiveAttribute>,
    uniforms: FxHashMap<String, glow::UniformLocation>,
    missing: RefCell<FxHashSet<String>>,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, GlError> {
        unsafe {
            let program = gl.create_program().map_err(GlError::create("program"))?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            if !gl.get_program_link_status(program) {
                let info_log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(GlError::Link(ShaderDiagnostic::link(info_log)));
            }

            let attributes = match Self::active_attributes(gl, program) {
                Ok(attributes) => attributes,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(e);
                }
            };
            let uniforms = Self::active_uniforms(gl, program);
            log::debug!(
                "linked program with attributes {:?} and uniforms {:?}",
                attributes.keys().collect::<Vec<_>>(),
                uniforms.keys().collect::<Vec<_>>(),
            );

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
                attributes,
                uniforms,
                missing: RefCell::default(),
            })
        }
    }

    /// Compiles a vertex and a fragment stage and links them.
    pub fn from_sources(
        gl: &Arc<glow::Context>,
        vertex: &str,
        fragment: &str,
    ) -> Result<Self, GlError> {
        let vert = Shader::new(gl, ShaderStage::Vertex, vertex)?;
        let frag = Shader::new(gl, ShaderStage::Fragment, fragment)?;
        Self::new(gl, &[&vert, &frag])
    }

    unsafe fn active_attributes(
        gl: &glow::Context,
        program: glow::Program,
    ) -> Result<FxHashMap<String, ActiveAttribute>, GlError> {
        let mut attributes = FxHashMap::default();
        unsafe {
            for index in 0..gl.get_active_attributes(program) {
                let Some(active) = gl.get_active_attribute(program, index) else {
                    continue;
                };
                let Some(location) = gl.get_attrib_location(program, &active.name) else {
                    continue;
                };
                let components = attribute_components(&active.name, active.atype)?;
                attributes.insert(
                    active.name,
                    ActiveAttribute {
                        location,
                        components,
                    },
                );
            }
        }
        Ok(attributes)
    }

    unsafe fn active_uniforms(
        gl: &glow::Context,
        program: glow::Program,
    ) -> FxHashMap<String, glow::UniformLocation> {
        let mut uniforms = FxHashMap::default();
        unsafe {
            for index in 0..gl.get_active_uniforms(program) {
                let Some(active) = gl.get_active_uniform(program, index) else {
                    continue;
                };
                if let Some(location) = gl.get_uniform_location(program, &active.name) {
                    uniforms.insert(active.name, location);
                }
            }
        }
        uniforms
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Looks up an active attribute by the name used in the vertex shader.
    pub fn attribute(&self, name: &str) -> Result<ActiveAttribute, GlError> {
        self.attributes
            .get(name)
            .copied()
            .ok_or_else(|| GlError::MissingAttribute(name.to_string()))
    }

    /// All active attributes, in no particular order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &ActiveAttribute)> {
        self.attributes
            .iter()
            .map(|(name, active)| (name.as_str(), active))
    }

    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniforms.contains_key(name)
    }

    /// Sets a uniform variable in the shader program. The program must be
    /// in use. Names the linker optimised away are skipped.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        match self.uniforms.get(name) {
            Some(location) => value.set_uniform(&self.gl, location),
            None => {
                if self.missing.borrow_mut().insert(name.to_string()) {
                    log::debug!("uniform `{name}` is not active, ignoring writes to it");
                }
            }
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
