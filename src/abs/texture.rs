//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture,
//! and [`PendingTexture`], a texture whose image is decoded on a worker thread and uploaded
//! once it arrives. Until then a 1x1 white placeholder is bound in its place.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, mpsc},
    thread,
};

use glow::HasContext;
use image::{DynamicImage, GenericImageView, ImageError};

use crate::abs::GlError;

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Creates a new texture from the given [`image::DynamicImage`].
    pub fn new(gl: &Arc<glow::Context>, image: &DynamicImage) -> Result<Self, GlError> {
        let (width, height) = image.dimensions();
        let data = image.to_rgba8().into_raw();
        Self::new_from_data(gl, width, height, &data)
    }

    /// Creates a new texture from the given raw RGBA data.
    ///
    /// ES 2.0 only allows mipmaps and repeat wrapping on power-of-two
    /// sizes, other sizes get clamped, linearly filtered textures.
    pub fn new_from_data(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<Self, GlError> {
        let power_of_two = width.is_power_of_two() && height.is_power_of_two();
        unsafe {
            let texture = gl.create_texture().map_err(GlError::create("texture"))?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data)),
            );
            let (wrap, min_filter) = if power_of_two {
                gl.generate_mipmap(glow::TEXTURE_2D);
                (glow::REPEAT, glow::LINEAR_MIPMAP_LINEAR)
            } else {
                (glow::CLAMP_TO_EDGE, glow::LINEAR)
            };
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, min_filter as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            })
        }
    }

    /// A single opaque white texel.
    pub fn placeholder(gl: &Arc<glow::Context>) -> Result<Self, GlError> {
        Self::new_from_data(gl, 1, 1, &[255, 255, 255, 255])
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}

/// Where a [`PendingTexture`] is in its load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    /// The image is still being read and decoded, the placeholder is bound.
    Loading,
    /// The image has been uploaded.
    Ready,
    /// The image could not be loaded, the placeholder stays bound.
    Failed,
}

type DecodeResult = Result<DynamicImage, ImageError>;

/// A texture whose image is loaded asynchronously.
///
/// Decoding runs on a worker thread; the upload itself has to happen on the
/// thread owning the GL context, so the owner calls [`PendingTexture::poll`]
/// once per frame (or [`PendingTexture::wait`] to block).
pub struct PendingTexture {
    gl: Arc<glow::Context>,
    path: PathBuf,
    placeholder: Texture,
    loaded: Option<Texture>,
    receiver: Option<mpsc::Receiver<DecodeResult>>,
    state: TextureState,
}

impl PendingTexture {
    /// Starts loading the image at `path`.
    pub fn load(gl: &Arc<glow::Context>, path: impl AsRef<Path>) -> Result<Self, GlError> {
        let path = path.as_ref().to_path_buf();
        let placeholder = Texture::placeholder(gl)?;

        let (sender, receiver) = mpsc::channel::<DecodeResult>();
        let worker_path = path.clone();
        thread::Builder::new()
            .name("texture-decode".into())
            .spawn(move || {
                // the receiver may already be gone if the scene was disposed
                let _ = sender.send(image::open(&worker_path));
            })
            .map_err(|e| GlError::create("texture decode thread")(e.to_string()))?;
        log::info!("loading texture {}", path.display());

        Ok(Self {
            gl: Arc::clone(gl),
            path,
            placeholder,
            loaded: None,
            receiver: Some(receiver),
            state: TextureState::Loading,
        })
    }

    pub fn state(&self) -> TextureState {
        self.state
    }

    /// Uploads the image if the worker has finished. Never blocks.
    pub fn poll(&mut self) -> TextureState {
        let Some(receiver) = &self.receiver else {
            return self.state;
        };
        match receiver.try_recv() {
            Ok(result) => self.finish(result),
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => self.fail("decode thread exited"),
        }
        self.state
    }

    /// Blocks until the worker has finished and uploads the image.
    pub fn wait(&mut self) -> TextureState {
        let Some(receiver) = &self.receiver else {
            return self.state;
        };
        match receiver.recv() {
            Ok(result) => self.finish(result),
            Err(mpsc::RecvError) => self.fail("decode thread exited"),
        }
        self.state
    }

    fn finish(&mut self, result: DecodeResult) {
        self.receiver = None;
        let uploaded = result
            .map_err(|e| e.to_string())
            .and_then(|image| Texture::new(&self.gl, &image).map_err(|e| e.to_string()));
        match uploaded {
            Ok(texture) => {
                log::info!(
                    "texture {} ready ({}x{})",
                    self.path.display(),
                    texture.width(),
                    texture.height()
                );
                self.loaded = Some(texture);
                self.state = TextureState::Ready;
            }
            Err(reason) => self.fail(&reason),
        }
    }

    fn fail(&mut self, reason: &str) {
        self.receiver = None;
        self.state = TextureState::Failed;
        log::error!(
            "could not load texture {}: {reason}; keeping the placeholder",
            self.path.display()
        );
    }

    /// Binds the loaded texture, or the placeholder while there is none.
    pub fn bind(&self, unit: u32) {
        self.loaded.as_ref().unwrap_or(&self.placeholder).bind(unit);
    }
}
