use std::collections::VecDeque;

use gloo_timers::callback::Timeout;
use log::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, KeyboardEvent};

use crate::dom::Listener;
use crate::error::{EffectsError, Result};

const MESSAGE: &str = "📸 Modo Fotógrafo Secreto Ativado! 📸";
const MESSAGE_STYLE: &str = "position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); \
    background: linear-gradient(45deg, #ff6b6b, #ffa726); color: white; padding: 2rem; \
    border-radius: 15px; font-size: 1.2rem; font-weight: bold; z-index: 10000; \
    animation: fadeInUp 0.5s ease-out;";

/// Keeps the most recent keys and reports when they spell the secret sequence.
#[derive(Debug, Clone)]
pub struct KonamiDetector {
    sequence: Vec<String>,
    recent: VecDeque<String>,
}

fn normalize(key: &str) -> String {
    // letters match regardless of shift or caps lock
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

impl KonamiDetector {
    pub fn new<I, S>(sequence: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sequence: Vec<String> = sequence.into_iter().map(|key| normalize(key.as_ref())).collect();
        Self {
            recent: VecDeque::with_capacity(sequence.len()),
            sequence,
        }
    }

    /// Records a key press. Returns true when the sequence completes; the buffer is then cleared.
    pub fn push(&mut self, key: &str) -> bool {
        if self.sequence.is_empty() {
            return false;
        }
        self.recent.push_back(normalize(key));
        if self.recent.len() > self.sequence.len() {
            self.recent.pop_front();
        }
        if self.recent.iter().eq(self.sequence.iter()) {
            self.recent.clear();
            return true;
        }
        false
    }
}

fn celebrate(document: &Document, duration_ms: u32) -> Result<()> {
    let body = document.body().ok_or_else(|| EffectsError::MissingElement("body".to_string()))?;
    body.style().set_property("filter", "hue-rotate(180deg)")?;

    let message = document.create_element("div")?;
    message.set_text_content(Some(MESSAGE));
    message.set_attribute("style", MESSAGE_STYLE)?;
    body.append_child(&message)?;

    Timeout::new(duration_ms, move || {
        let _ = body.style().set_property("filter", "");
        message.remove();
    })
    .forget();
    Ok(())
}

pub fn install(document: &Document, sequence: &[String], duration_ms: u32) -> Result<Listener> {
    let mut detector = KonamiDetector::new(sequence);
    let listener = Listener::new(document, "keydown", {
        let document = document.clone();
        move |event: Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if detector.push(&event.key()) {
                info!("Secret photographer mode activated");
                if let Err(e) = celebrate(&document, duration_ms) {
                    warn!("Easter egg failed: {}", e);
                }
            }
        }
    })?;
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EffectsConfig;

    fn detector() -> KonamiDetector {
        KonamiDetector::new(&EffectsConfig::default().konami_sequence)
    }

    const CODE: [&str; 10] = [
        "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft", "ArrowRight", "ArrowLeft",
        "ArrowRight", "b", "a",
    ];

    fn type_keys(detector: &mut KonamiDetector, keys: &[&str]) -> Vec<bool> {
        keys.iter().map(|key| detector.push(key)).collect()
    }

    #[test]
    fn fires_on_last_key_only() {
        let mut detector = detector();
        let hits = type_keys(&mut detector, &CODE);
        assert_eq!(hits.iter().filter(|hit| **hit).count(), 1);
        assert_eq!(hits.last(), Some(&true));
    }

    #[test]
    fn leading_noise_is_forgotten() {
        let mut detector = detector();
        type_keys(&mut detector, &["x", "Enter", "ArrowUp"]);
        assert_eq!(type_keys(&mut detector, &CODE).last(), Some(&true));
    }

    #[test]
    fn letters_ignore_case() {
        let mut detector = detector();
        let mut keys = CODE.to_vec();
        keys[8] = "B";
        keys[9] = "A";
        assert_eq!(type_keys(&mut detector, &keys).last(), Some(&true));
    }

    #[test]
    fn buffer_clears_after_match() {
        let mut detector = detector();
        type_keys(&mut detector, &CODE);
        // the tail of a finished code must not count towards the next one
        assert!(!detector.push("a"));
        assert_eq!(type_keys(&mut detector, &CODE).last(), Some(&true));
    }

    #[test]
    fn wrong_order_never_fires() {
        let mut detector = detector();
        let mut keys = CODE.to_vec();
        keys.swap(8, 9);
        assert!(type_keys(&mut detector, &keys).iter().all(|hit| !hit));
    }

    #[test]
    fn empty_sequence_never_fires() {
        let mut detector = KonamiDetector::new(Vec::<String>::new());
        assert!(!detector.push("a"));
    }
}
