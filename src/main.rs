//! Headless demo: slides two panels in and out and pops an auto-hiding
//! toast, logging the life cycle as it goes.

use std::path::Path;

use viewkit::animation::AnimationType;
use viewkit::behavior::actions::{Action, ActionBundle};
use viewkit::behavior::BehaviorSpec;
use viewkit::options::Options;
use viewkit::registry::ViewRegistry;
use viewkit::util::frame_timing::FrameTiming;
use viewkit::view::{
    MemorySurface, StartBehavior, ViewSettings, VisibilityOrchestrator,
};
use web_time::Instant;

/// Frame at which the demo hides the panels again.
const HIDE_FRAME: u64 = 60;
/// Frame at which the demo gives up waiting for everything to settle.
const LAST_FRAME: u64 = 600;

fn panel(index: usize) -> VisibilityOrchestrator {
    let mut settings = ViewSettings::named("General", "Panel");
    settings.start_behavior = StartBehavior::Hide;
    let show = BehaviorSpec::new(AnimationType::Show)
        .with_preset("Slide", "FromLeft")
        .on_finished(ActionBundle::new().with_action(Action::Sound {
            name: "panel_open".to_owned(),
        }));
    let hide = BehaviorSpec::new(AnimationType::Hide)
        .with_preset("Slide", "ToRight");
    let mut view = VisibilityOrchestrator::new(settings, MemorySurface::new())
        .with_show_behavior(show)
        .with_hide_behavior(hide);
    view.add_progress_listener(move |event| {
        log::trace!("panel {index}: progress {:.2}", event.progress);
    });
    view
}

fn toast() -> VisibilityOrchestrator {
    let mut settings = ViewSettings::named("Popups", "Toast");
    settings.start_behavior = StartBehavior::PlayShowAnimation;
    settings.auto_hide_after_show = true;
    settings.auto_hide_delay = 0.5;
    VisibilityOrchestrator::new(settings, MemorySurface::new())
        .with_show_behavior(
            BehaviorSpec::new(AnimationType::Show).with_preset("Zoom", "In"),
        )
}

fn load_options() -> Result<Options, viewkit::error::ViewError> {
    match std::env::args().nth(1) {
        Some(path) => Options::load(Path::new(&path)),
        None => Ok(Options::default()),
    }
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let options = match load_options() {
        Ok(options) => options,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    let mut registry = match ViewRegistry::from_options(options) {
        Ok(registry) => registry,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    for index in 0..2 {
        let _ = registry.register(panel(index));
    }
    let _ = registry.register(toast());
    let shown = registry.show_by_identity("General", "Panel", false);
    log::info!("showing {shown} panels");

    let mut timing = FrameTiming::new(60, Instant::now());
    while timing.frames() < LAST_FRAME {
        std::thread::sleep(timing.until_next(Instant::now()));
        registry.tick();
        timing.end_frame(Instant::now());

        if timing.frames() == HIDE_FRAME {
            let hidden = registry.hide_by_identity("General", "Panel", false);
            log::info!("hiding {hidden} panels");
        }
        let settled = registry.views().all(|(_, view)| !view.is_transitioning());
        if timing.frames() > HIDE_FRAME && settled && registry.visible_views().is_empty() {
            break;
        }
    }

    log::info!(
        "done after {} frames ({:.1} fps), gate count {}",
        timing.frames(),
        timing.fps(),
        registry.gate().count()
    );
}
