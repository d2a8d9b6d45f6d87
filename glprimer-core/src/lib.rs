//! The GL-free half of glprimer. This crate holds everything a lesson needs
//! that can be computed on the host without a rendering context: the
//! model/view/projection pipeline, geometry generators, buffer layout
//! validation and shader info-log parsing.

pub mod diagnostic;
pub mod geometry;
pub mod layout;
pub mod transform;

pub use diagnostic::{DiagnosticMessage, Severity, ShaderDiagnostic, ShaderStage};
pub use layout::{AttributeLayout, LayoutError};
pub use transform::{Axis, Perspective, Spin, Transforms};
