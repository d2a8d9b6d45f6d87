//! Errors raised by the GL abstraction layer.

use glprimer_core::{LayoutError, ShaderDiagnostic};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlError {
    /// The platform could not give us an OpenGL ES 2.0 context.
    #[error("OpenGL ES 2.0 is not supported here: {0}")]
    ContextUnsupported(String),
    /// Window system failure outside of context creation.
    #[error("platform error: {0}")]
    Platform(String),
    /// The driver refused to create an object (buffer, shader, texture...).
    #[error("could not create {kind}: {reason}")]
    Create { kind: &'static str, reason: String },
    #[error("{0}")]
    Compile(ShaderDiagnostic),
    #[error("{0}")]
    Link(ShaderDiagnostic),
    #[error("the shader program has no active attribute named `{0}`")]
    MissingAttribute(String),
    #[error("attribute `{name}` has unsupported GLSL type 0x{gl_type:04X}")]
    UnsupportedAttributeType { name: String, gl_type: u32 },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl GlError {
    pub(crate) fn create(kind: &'static str) -> impl FnOnce(String) -> GlError {
        move |reason| GlError::Create { kind, reason }
    }
}
