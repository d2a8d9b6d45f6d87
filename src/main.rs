use anyhow::Context;

use crate::{
    abs::App,
    config::{Config, Overrides},
    lessons::{Lesson, LessonSettings},
};

mod abs;
mod config;
mod frame;
mod lessons;
mod logging;
mod scene;

fn print_lessons() {
    for lesson in Lesson::ALL {
        let number = lesson
            .number()
            .map(|number| format!("{number:>2}"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{number}  {:<18} {}", lesson.name(), lesson.description());
    }
}

fn main() -> anyhow::Result<()> {
    let overrides = Overrides::from_args(std::env::args().skip(1))?;
    if overrides.list {
        print_lessons();
        return Ok(());
    }

    let mut config = Config::load(overrides.config.as_deref())?;
    config.apply(&overrides);
    logging::init(&config.log).context("failed to set up logging")?;

    let lesson: Lesson = config.lesson.parse()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("lesson `{lesson}`, seed {seed}");

    let mut app = App::new(&config.window, config.vsync).context("failed to open a window")?;
    let settings = LessonSettings::from_config(&config, app.aspect(), seed);
    let scene = lesson
        .build(&app.gl, &settings)
        .with_context(|| format!("failed to build lesson `{lesson}`"))?;

    let stats = frame::run(&mut app, scene, config.max_frames);
    log::info!(
        "{} frames in {:.2}s ({:.1} fps)",
        stats.frames,
        stats.elapsed.as_secs_f64(),
        stats.fps()
    );
    Ok(())
}
