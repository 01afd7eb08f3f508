use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::config::EffectsConfig;
use crate::dom::{self, Listener};
use crate::error::Result;

const OPEN_CLASS: &str = "active";
const TOGGLE_ATTR: &str = "data-toggle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Opened { panel: String, replaced: Option<String> },
    Closed { panel: String },
}

/// Read-more panels, at most one open per section.
#[derive(Debug, Default)]
pub struct Accordion {
    open: HashMap<String, String>,
}

impl Accordion {
    pub fn toggle(&mut self, section: &str, panel: &str) -> Transition {
        match self.open.get(section) {
            Some(current) if current == panel => {
                self.open.remove(section);
                Transition::Closed { panel: panel.to_string() }
            }
            _ => {
                let replaced = self.open.insert(section.to_string(), panel.to_string());
                Transition::Opened {
                    panel: panel.to_string(),
                    replaced,
                }
            }
        }
    }

    pub fn is_open(&self, panel: &str) -> bool {
        self.open.values().any(|open| open == panel)
    }
}

fn button_for(document: &Document, panel: &str) -> Result<Option<Element>> {
    Ok(document.query_selector(&format!("[{}=\"{}\"]", TOGGLE_ATTR, panel))?)
}

fn collapse(document: &Document, panel: &str, label: &str) -> Result<()> {
    if let Some(content) = document.get_element_by_id(panel) {
        content.class_list().remove_1(OPEN_CLASS)?;
        dom::set_style(&content, "max-height", "0")?;
    }
    if let Some(button) = button_for(document, panel)? {
        button.set_text_content(Some(label));
    }
    Ok(())
}

fn expand(content: &Element, button: &Element, config: &EffectsConfig) -> Result<()> {
    content.class_list().add_1(OPEN_CLASS)?;
    button.set_text_content(Some(&config.read_less_label));
    dom::set_style(content, "max-height", &format!("{}px", content.scroll_height()))?;

    let content = content.clone();
    Timeout::new(config.toggle_scroll_delay_ms, move || {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Nearest);
        content.scroll_into_view_with_scroll_into_view_options(&options);
    })
    .forget();
    Ok(())
}

fn on_click(document: &Document, accordion: &mut Accordion, event: &Event, config: &EffectsConfig) -> Result<()> {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return Ok(());
    };
    let Some(button) = target.closest(&format!("[{}]", TOGGLE_ATTR))? else {
        return Ok(());
    };
    let Some(panel) = button.get_attribute(TOGGLE_ATTR) else {
        return Ok(());
    };
    let Some(content) = document.get_element_by_id(&panel) else {
        debug!("Toggle target #{} is not on the page", panel);
        return Ok(());
    };
    let section = content
        .closest("section")?
        .map(|section| section.id())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| panel.clone());

    match accordion.toggle(&section, &panel) {
        Transition::Closed { panel } => collapse(document, &panel, &config.read_more_label)?,
        Transition::Opened { replaced, .. } => {
            if let Some(other) = replaced {
                collapse(document, &other, &config.read_more_label)?;
            }
            expand(&content, &button, config)?;
        }
    }
    Ok(())
}

pub fn install(document: &Document, config: &EffectsConfig) -> Result<Listener> {
    let mut accordion = Accordion::default();
    let listener = Listener::new(document, "click", {
        let document = document.clone();
        let config = config.clone();
        move |event: Event| {
            if let Err(e) = on_click(&document, &mut accordion, &event, &config) {
                warn!("Content toggle failed: {}", e);
            }
        }
    })?;
    info!("Content toggle installed");
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_closes() {
        let mut accordion = Accordion::default();
        assert_eq!(
            accordion.toggle("chapters", "ch1"),
            Transition::Opened { panel: "ch1".into(), replaced: None }
        );
        assert!(accordion.is_open("ch1"));
        assert_eq!(
            accordion.toggle("chapters", "ch1"),
            Transition::Closed { panel: "ch1".into() }
        );
        assert!(!accordion.is_open("ch1"));
    }

    #[test]
    fn opening_closes_sibling_in_same_section() {
        let mut accordion = Accordion::default();
        accordion.toggle("chapters", "ch1");
        assert_eq!(
            accordion.toggle("chapters", "ch2"),
            Transition::Opened { panel: "ch2".into(), replaced: Some("ch1".into()) }
        );
        assert!(!accordion.is_open("ch1"));
        assert!(accordion.is_open("ch2"));
    }

    #[test]
    fn sections_are_independent() {
        let mut accordion = Accordion::default();
        accordion.toggle("chapters", "ch1");
        assert_eq!(
            accordion.toggle("resources", "res1"),
            Transition::Opened { panel: "res1".into(), replaced: None }
        );
        assert!(accordion.is_open("ch1"));
        assert!(accordion.is_open("res1"));
    }
}
