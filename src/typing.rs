use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::config::EffectsConfig;
use crate::error::Result;

const CURSOR: &str = "2px solid white";

/// Yields successively longer prefixes of a title, one character at a time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    typed: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            typed: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.typed >= self.chars.len()
    }
}

impl Iterator for Typewriter {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.is_done() {
            return None;
        }
        self.typed += 1;
        Some(self.chars[..self.typed].iter().collect())
    }
}

#[derive(Clone, Copy)]
struct Timing {
    char_delay_ms: u32,
    cursor_hold_ms: u32,
}

fn schedule(title: HtmlElement, writer: Rc<RefCell<Typewriter>>, delay_ms: u32, timing: Timing) {
    Timeout::new(delay_ms, move || {
        let next = writer.borrow_mut().next();
        match next {
            Some(prefix) => {
                title.set_text_content(Some(&prefix));
                schedule(title, writer, timing.char_delay_ms, timing);
            }
            None => {
                Timeout::new(timing.cursor_hold_ms, move || {
                    let _ = title.style().set_property("border-right", "none");
                })
                .forget();
            }
        }
    })
    .forget();
}

pub fn install(document: &Document, config: &EffectsConfig) -> Result<()> {
    let Some(title) = document
        .query_selector(".hero h1")?
        .and_then(|t| t.dyn_into::<HtmlElement>().ok())
    else {
        debug!("No hero title, skipping typing effect");
        return Ok(());
    };

    let text = title.text_content().unwrap_or_default();
    title.set_text_content(Some(""));
    title.style().set_property("border-right", CURSOR)?;

    let timing = Timing {
        char_delay_ms: config.typing_char_delay_ms,
        cursor_hold_ms: config.typing_cursor_hold_ms,
    };
    info!("Typing hero title ({} chars)", text.chars().count());
    schedule(
        title,
        Rc::new(RefCell::new(Typewriter::new(&text))),
        config.typing_start_delay_ms,
        timing,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_one_char_per_step() {
        let frames: Vec<_> = Typewriter::new("Luz").collect();
        assert_eq!(frames, vec!["L", "Lu", "Luz"]);
    }

    #[test]
    fn handles_multibyte_text() {
        let mut writer = Typewriter::new("Fotógrafo 📸");
        let frames: Vec<_> = writer.by_ref().collect();
        assert_eq!(frames.len(), 11);
        assert_eq!(frames[3], "Fotó");
        assert_eq!(frames.last().map(String::as_str), Some("Fotógrafo 📸"));
        assert!(writer.is_done());
        assert_eq!(writer.next(), None);
    }

    #[test]
    fn empty_title_is_done_immediately() {
        let mut writer = Typewriter::new("");
        assert!(writer.is_done());
        assert_eq!(writer.next(), None);
    }
}
