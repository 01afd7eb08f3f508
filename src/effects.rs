use log::{info, warn};
use web_sys::{Document, Event, Window};

use crate::config::EffectsConfig;
use crate::dom::{self, Listener};
use crate::error::Result;
use crate::observer::ViewportObserver;
use crate::reveal::dom::DomTracker;
use crate::{easter_egg, form, lazy, nav, particles, progress, reveal, tilt, toggle, typing};

/// Everything installed on the page. Dropping it detaches listeners and observers;
/// timers that are already scheduled still run.
pub struct Effects {
    _reveal: DomTracker,
    _lazy: Option<DomTracker>,
    _progress: Option<ViewportObserver>,
    _listeners: Vec<Listener>,
}

pub fn is_slow_load(load_ms: f64, warn_after_ms: f64) -> bool {
    load_ms > warn_after_ms
}

pub fn is_loaded(ready_state: &str) -> bool {
    ready_state == "complete"
}

fn report_load(window: &Window, warn_after_ms: f64) {
    let Some(performance) = window.performance() else {
        return;
    };
    let load_ms = performance.now();
    info!("Page loaded in {:.2}ms", load_ms);
    if is_slow_load(load_ms, warn_after_ms) {
        warn!("Slow load detected, consider optimizing images and resources");
    }
}

fn monitor_load(window: &Window, document: &Document, warn_after_ms: f64) -> Result<Option<Listener>> {
    // the wasm bundle can finish loading after the window load event
    if is_loaded(&document.ready_state()) {
        report_load(window, warn_after_ms);
        return Ok(None);
    }
    let listener = Listener::new(window, "load", {
        let window = window.clone();
        move |_: Event| report_load(&window, warn_after_ms)
    })?;
    Ok(Some(listener))
}

impl Effects {
    pub fn install(config: &EffectsConfig) -> Result<Self> {
        let window = dom::window()?;
        let document = dom::document()?;

        let mut listeners = nav::install(&window, &document, config)?;
        listeners.push(toggle::install(&document, config)?);
        listeners.extend(form::install(&document, config)?);
        listeners.extend(tilt::install(&document, config.tilt_divisor)?);
        listeners.push(easter_egg::install(
            &document,
            &config.konami_sequence,
            config.easter_egg_ms,
        )?);
        listeners.extend(monitor_load(&window, &document, config.slow_load_warning_ms)?);

        particles::install(&document, config.particle_count)?;
        typing::install(&document, config)?;
        let progress = progress::install(&document, config.progress_stagger_ms)?;
        let lazy = lazy::install(&document)?;

        // marks elements hidden, so it must not run ahead of a step that can fail
        let reveal = reveal::dom::install(&document, config)?;

        info!("Page effects installed ({} listeners)", listeners.len());
        Ok(Self {
            _reveal: reveal,
            _lazy: lazy,
            _progress: progress,
            _listeners: listeners,
        })
    }
}
