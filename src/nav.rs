use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::config::EffectsConfig;
use crate::dom::{self, Listener};
use crate::error::Result;

const NAV_LINKS: &str = "nav a[href^=\"#\"]";
const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// The section the reader is currently in. Later sections win when bounds overlap.
pub fn active_section(sections: &[SectionBounds], scroll_y: f64, offset: f64) -> Option<&str> {
    sections
        .iter()
        .filter(|section| {
            let top = section.top - offset;
            scroll_y >= top && scroll_y < top + section.height
        })
        .last()
        .map(|section| section.id.as_str())
}

pub fn nav_background(scroll_y: f64, config: &EffectsConfig) -> &str {
    if scroll_y > config.nav_solid_after {
        &config.nav_background_solid
    } else {
        &config.nav_background_translucent
    }
}

pub fn parallax_transform(scroll_y: f64, factor: f64) -> String {
    format!("translateY({}px)", scroll_y * factor)
}

pub fn anchor_scroll_top(target_offset_top: f64, nav_offset: f64) -> f64 {
    target_offset_top - nav_offset
}

fn section_bounds(document: &Document) -> Result<Vec<SectionBounds>> {
    Ok(dom::query_all(document, "section[id]")?
        .into_iter()
        .filter_map(|section| {
            let top = section.dyn_ref::<HtmlElement>()?.offset_top();
            Some(SectionBounds {
                id: section.id(),
                top: f64::from(top),
                height: f64::from(section.client_height()),
            })
        })
        .collect())
}

fn on_scroll(window: &Window, document: &Document, config: &EffectsConfig) -> Result<()> {
    let scroll_y = window.scroll_y()?;

    if let Some(hero) = document.query_selector(".hero")? {
        dom::set_style(&hero, "transform", &parallax_transform(scroll_y, config.parallax_factor))?;
    }
    if let Some(nav) = document.query_selector("nav")? {
        dom::set_style(&nav, "background", nav_background(scroll_y, config))?;
    }

    let sections = section_bounds(document)?;
    let current = active_section(&sections, scroll_y, config.section_activation_offset)
        .map(|id| format!("#{}", id));
    for link in dom::query_all(document, NAV_LINKS)? {
        let classes = link.class_list();
        classes.remove_1(ACTIVE_CLASS)?;
        if current.is_some() && link.get_attribute("href") == current {
            classes.add_1(ACTIVE_CLASS)?;
        }
    }
    Ok(())
}

fn scroll_to_anchor(window: &Window, document: &Document, link: &Element, nav_offset: f64) -> Result<()> {
    let Some(href) = link.get_attribute("href") else {
        return Ok(());
    };
    // "#" alone or an id that is not a valid selector simply doesn't scroll
    let Ok(Some(target)) = document.query_selector(&href) else {
        debug!("No scroll target for {}", href);
        return Ok(());
    };
    let Some(target) = target.dyn_ref::<HtmlElement>() else {
        return Ok(());
    };

    let options = ScrollToOptions::new();
    options.set_top(anchor_scroll_top(f64::from(target.offset_top()), nav_offset));
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
    Ok(())
}

fn install_mobile_menu(document: &Document, listeners: &mut Vec<Listener>) -> Result<()> {
    let (Some(button), Some(menu)) = (
        document.query_selector(".mobile-menu-button")?,
        document.query_selector(".mobile-menu")?,
    ) else {
        debug!("No mobile menu on page");
        return Ok(());
    };

    listeners.push(Listener::new(&button, "click", {
        let menu = menu.clone();
        move |_: Event| {
            let _ = menu.class_list().toggle(ACTIVE_CLASS);
        }
    })?);

    for link in dom::query_all_in(&menu, "a")? {
        listeners.push(Listener::new(&link, "click", {
            let menu = menu.clone();
            move |_: Event| {
                let _ = menu.class_list().remove_1(ACTIVE_CLASS);
            }
        })?);
    }
    Ok(())
}

pub fn install(window: &Window, document: &Document, config: &EffectsConfig) -> Result<Vec<Listener>> {
    let mut listeners = Vec::new();

    let links = dom::query_all(document, NAV_LINKS)?;
    for link in &links {
        listeners.push(Listener::new(link, "click", {
            let window = window.clone();
            let document = document.clone();
            let link = link.clone();
            let nav_offset = config.nav_scroll_offset;
            move |event: Event| {
                event.prevent_default();
                if let Err(e) = scroll_to_anchor(&window, &document, &link, nav_offset) {
                    warn!("Smooth scroll failed: {}", e);
                }
            }
        })?);
    }

    listeners.push(Listener::new(window, "scroll", {
        let window = window.clone();
        let document = document.clone();
        let config = config.clone();
        move |_: Event| {
            if let Err(e) = on_scroll(&window, &document, &config) {
                warn!("Scroll handler failed: {}", e);
            }
        }
    })?);

    install_mobile_menu(document, &mut listeners)?;

    info!("Navigation installed with {} anchor links", links.len());
    Ok(listeners)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionBounds> {
        vec![
            SectionBounds { id: "intro".into(), top: 0.0, height: 600.0 },
            SectionBounds { id: "chapters".into(), top: 600.0, height: 1200.0 },
            SectionBounds { id: "contact".into(), top: 1800.0, height: 400.0 },
        ]
    }

    #[test]
    fn activation_line_sits_above_section_top() {
        let sections = sections();
        assert_eq!(active_section(&sections, 0.0, 100.0), Some("intro"));
        assert_eq!(active_section(&sections, 499.0, 100.0), Some("intro"));
        assert_eq!(active_section(&sections, 500.0, 100.0), Some("chapters"));
        assert_eq!(active_section(&sections, 1750.0, 100.0), Some("contact"));
    }

    #[test]
    fn no_section_past_the_end() {
        assert_eq!(active_section(&sections(), 5000.0, 100.0), None);
        assert_eq!(active_section(&[], 0.0, 100.0), None);
    }

    #[test]
    fn overlapping_sections_pick_the_last() {
        let sections = vec![
            SectionBounds { id: "outer".into(), top: 0.0, height: 1000.0 },
            SectionBounds { id: "inner".into(), top: 200.0, height: 200.0 },
        ];
        assert_eq!(active_section(&sections, 250.0, 0.0), Some("inner"));
        assert_eq!(active_section(&sections, 450.0, 0.0), Some("outer"));
    }

    #[test]
    fn background_turns_solid_past_threshold() {
        let config = EffectsConfig::default();
        assert_eq!(nav_background(100.0, &config), "rgba(255, 255, 255, 0.9)");
        assert_eq!(nav_background(100.5, &config), "rgba(255, 255, 255, 0.95)");
    }

    #[test]
    fn parallax_moves_at_half_speed() {
        assert_eq!(parallax_transform(300.0, 0.5), "translateY(150px)");
        assert_eq!(parallax_transform(0.0, 0.5), "translateY(0px)");
    }

    #[test]
    fn anchor_target_clears_fixed_nav() {
        assert_eq!(anchor_scroll_top(1000.0, 80.0), 920.0);
    }
}
