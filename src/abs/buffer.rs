//! Attribute buffers and meshes.
//!
//! A [`VertexBuffer`] is one flat float sequence on the GPU. A [`Mesh`]
//! groups index-aligned buffers under the attribute names the shader
//! declares and issues the draw call.

use std::sync::Arc;

use glow::HasContext;
use glprimer_core::{AttributeLayout, layout};
use serde::{Deserialize, Serialize};

use crate::abs::{GlError, ShaderProgram};

/// Hint telling the driver how often the buffer contents change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferUsage {
    #[default]
    Static,
    Dynamic,
}

impl BufferUsage {
    fn gl_enum(self) -> u32 {
        match self {
            BufferUsage::Static => glow::STATIC_DRAW,
            BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        }
    }
}

/// Represents one attribute buffer stored on the GPU side.
pub struct VertexBuffer {
    gl: Arc<glow::Context>,
    id: glow::Buffer,
    layout: AttributeLayout,
    vertex_count: usize,
}

impl VertexBuffer {
    /// Uploads `data` as `components` floats per vertex.
    ///
    /// The contents are fixed once uploaded; to change them, drop the buffer
    /// and create a new one.
    pub fn new(
        gl: &Arc<glow::Context>,
        layout: AttributeLayout,
        data: &[f32],
        usage: BufferUsage,
    ) -> Result<Self, GlError> {
        let vertex_count = layout.vertex_count(data.len())?;
        unsafe {
            let buffer = gl.create_buffer().map_err(GlError::create("buffer"))?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                usage.gl_enum(),
            );
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: buffer,
                layout,
                vertex_count,
            })
        }
    }

    /// Points the attribute at `location` to this buffer, tightly packed.
    fn bind_to(&self, location: u32) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.id));
            self.gl.enable_vertex_attrib_array(location);
            self.gl.vertex_attrib_pointer_f32(
                location,
                self.layout.components as i32,
                glow::FLOAT,
                false,
                0,
                0,
            );
        }
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.id);
        }
    }
}

/// Which primitive a mesh is rasterized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
    Points,
}

impl DrawMode {
    fn gl_enum(self) -> u32 {
        match self {
            DrawMode::Triangles => glow::TRIANGLES,
            DrawMode::Points => glow::POINTS,
        }
    }
}

/// A set of index-aligned attribute buffers drawn with `draw_arrays`.
pub struct Mesh {
    gl: Arc<glow::Context>,
    draw_mode: DrawMode,
    usage: BufferUsage,
    buffers: Vec<VertexBuffer>,
    vertex_count: usize,
}

impl Mesh {
    pub fn new(gl: &Arc<glow::Context>, draw_mode: DrawMode) -> Self {
        Self {
            gl: Arc::clone(gl),
            draw_mode,
            usage: BufferUsage::Static,
            buffers: Vec::new(),
            vertex_count: 0,
        }
    }

    /// Sets the usage hint for the buffers added after this call.
    pub fn with_usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Uploads an attribute buffer named after the shader attribute it
    /// feeds. Every attribute must describe the same number of vertices.
    pub fn with_attribute(
        mut self,
        name: &str,
        components: usize,
        data: &[f32],
    ) -> Result<Self, GlError> {
        let layout = AttributeLayout::new(name, components)?;
        let buffer = VertexBuffer::new(&self.gl, layout, data, self.usage)?;
        self.vertex_count = layout::common_vertex_count(
            self.buffers
                .iter()
                .chain(std::iter::once(&buffer))
                .map(|b| (b.layout.name.as_str(), b.vertex_count)),
        )?;
        self.buffers.push(buffer);
        Ok(self)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Checks the buffers against the attributes the program declares: each
    /// buffer must feed an attribute of its size, and each attribute must be
    /// fed. Run once after building the program and the mesh.
    pub fn check_against(&self, program: &ShaderProgram) -> Result<(), GlError> {
        let mut declared: Vec<(&str, usize)> = program
            .attributes()
            .map(|(name, active)| (name, active.components))
            .collect();
        declared.sort_unstable();
        let provided: Vec<(&str, usize)> = self
            .buffers
            .iter()
            .map(|b| (b.layout.name.as_str(), b.layout.components))
            .collect();
        layout::match_attributes(&declared, &provided)?;
        Ok(())
    }

    /// Wires each buffer to its attribute and draws the whole mesh with the
    /// program, which must be in use.
    pub fn draw(&self, program: &ShaderProgram) {
        for buffer in &self.buffers {
            if let Ok(active) = program.attribute(&buffer.layout.name) {
                buffer.bind_to(active.location);
            }
        }
        unsafe {
            self.gl
                .draw_arrays(self.draw_mode.gl_enum(), 0, self.vertex_count as i32);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_hints() {
        assert_eq!(BufferUsage::Static.gl_enum(), glow::STATIC_DRAW);
        assert_eq!(BufferUsage::Dynamic.gl_enum(), glow::DYNAMIC_DRAW);
        assert_eq!(BufferUsage::default(), BufferUsage::Static);
    }

    #[test]
    fn test_usage_from_json() {
        let usage: BufferUsage = serde_json::from_str("\"dynamic\"").unwrap();
        assert_eq!(usage, BufferUsage::Dynamic);
        assert!(serde_json::from_str::<BufferUsage>("\"stream\"").is_err());
    }

    #[test]
    fn test_draw_modes() {
        assert_eq!(DrawMode::Triangles.gl_enum(), glow::TRIANGLES);
        assert_eq!(DrawMode::Points.gl_enum(), glow::POINTS);
    }
}
