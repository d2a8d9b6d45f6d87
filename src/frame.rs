//! The frame loop.

use std::time::{Duration, Instant};

use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
};

use crate::{
    abs::App,
    scene::{FrameContext, Scene},
};

/// What a finished loop reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub elapsed: Duration,
}

impl FrameStats {
    /// Average frames per second over the whole run.
    pub fn fps(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.frames as f64 / seconds
        } else {
            0.0
        }
    }
}

/// Whether the loop should stop before producing frame number `frame`.
fn reached_limit(frame: u64, max_frames: Option<u64>) -> bool {
    max_frames.is_some_and(|max| frame >= max)
}

/// Runs `scene` until the window is closed, `Escape` is pressed or
/// `max_frames` frames have been drawn. The scene is disposed on the way
/// out.
pub fn run(app: &mut App, mut scene: Scene, max_frames: Option<u64>) -> FrameStats {
    let (width, height) = app.drawable_size();
    scene.resize(width, height);

    let start = Instant::now();
    let mut last_frame_time = start;
    let mut frames = 0;

    'running: loop {
        if reached_limit(frames, max_frames) {
            log::info!("reached the frame limit of {frames}");
            break;
        }

        for event in app.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::Resized(..) | WindowEvent::SizeChanged(..),
                    ..
                } => {
                    // the event carries the logical size, the viewport wants pixels
                    let (width, height) = app.window.drawable_size();
                    scene.resize(width, height);
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let context = FrameContext {
            frame: frames,
            elapsed: now.duration_since(start).as_secs_f32(),
            delta: now.duration_since(last_frame_time).as_secs_f32(),
        };
        last_frame_time = now;

        scene.update(&context);
        scene.render();
        app.window.gl_swap_window();

        frames += 1;
    }

    let stats = FrameStats {
        frames,
        elapsed: start.elapsed(),
    };
    log::debug!(
        "`{}` ran {} frames, texture {:?}",
        scene.name(),
        stats.frames,
        scene.texture_state()
    );
    scene.dispose();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps() {
        let stats = FrameStats {
            frames: 120,
            elapsed: Duration::from_secs(2),
        };
        assert_eq!(stats.fps(), 60.0);
    }

    #[test]
    fn test_fps_without_time() {
        let stats = FrameStats {
            frames: 0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(stats.fps(), 0.0);
    }

    #[test]
    fn test_frame_limit() {
        assert!(!reached_limit(1_000_000, None));
        assert!(!reached_limit(2, Some(3)));
        assert!(reached_limit(3, Some(3)));
        assert!(reached_limit(0, Some(0)));
    }
}
