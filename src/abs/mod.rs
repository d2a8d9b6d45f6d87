//! This module contains the GL-facing half of the bootstrap: context
//! acquisition, buffer upload, shader programs and textures.

pub mod app;
pub mod buffer;
pub mod error;
pub mod shader;
pub mod texture;

pub use app::*;
pub use buffer::*;
pub use error::*;
pub use shader::*;
pub use texture::*;
