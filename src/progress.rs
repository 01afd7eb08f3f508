use gloo_timers::callback::Timeout;
use log::{debug, info};
use web_sys::js_sys::Math;
use web_sys::{Document, Element};

use crate::dom;
use crate::error::Result;
use crate::observer::{ObserverOptions, ViewportObserver};

const BAR_STYLE: &str =
    "width: 100%; height: 4px; background: #e0e0e0; border-radius: 2px; margin-top: 1rem; overflow: hidden;";
const FILL_STYLE: &str =
    "width: 0%; height: 100%; background: linear-gradient(45deg, #667eea, #764ba2); border-radius: 2px; transition: width 1s ease;";

/// Fake reading progress in percent, from a sample in `[0, 1)`.
pub fn fill_percent(sample: f64) -> f64 {
    sample * 60.0 + 20.0
}

pub fn fill_delay_ms(card_index: usize, stagger_ms: u32) -> u32 {
    u32::try_from(card_index)
        .unwrap_or(u32::MAX)
        .saturating_mul(stagger_ms)
}

fn attach_bar(document: &Document, card: &Element) -> Result<Element> {
    let bar = document.create_element("div")?;
    bar.set_class_name("progress-bar");
    bar.set_attribute("style", BAR_STYLE)?;

    let fill = document.create_element("div")?;
    fill.set_class_name("progress-fill");
    fill.set_attribute("style", FILL_STYLE)?;

    bar.append_child(&fill)?;
    card.append_child(&bar)?;
    Ok(fill)
}

/// Adds a bar to every chapter card and animates it each time the card scrolls into view.
pub fn install(document: &Document, stagger_ms: u32) -> Result<Option<ViewportObserver>> {
    let cards = dom::query_all(document, ".chapter-card")?;
    if cards.is_empty() {
        debug!("No chapter cards, skipping progress bars");
        return Ok(None);
    }

    let mut fills = Vec::with_capacity(cards.len());
    for card in &cards {
        fills.push(attach_bar(document, card)?);
    }

    let observer = ViewportObserver::new(&ObserverOptions::default(), {
        let cards = cards.clone();
        move |entries| {
            for entry in entries.iter().filter(|entry| entry.is_intersecting()) {
                let target = entry.target();
                let Some(index) = cards.iter().position(|card| *card == target) else {
                    continue;
                };
                let fill = fills[index].clone();
                Timeout::new(fill_delay_ms(index, stagger_ms), move || {
                    let width = format!("{}%", fill_percent(Math::random()));
                    let _ = dom::set_style(&fill, "width", &width);
                })
                .forget();
            }
        }
    })?;

    for card in &cards {
        observer.observe(card);
    }
    info!("Progress bars attached to {} chapter cards", cards.len());
    Ok(Some(observer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_stays_between_twenty_and_eighty() {
        assert_eq!(fill_percent(0.0), 20.0);
        assert_eq!(fill_percent(0.5), 50.0);
        assert!(fill_percent(0.9999) < 80.0);
    }

    #[test]
    fn cards_fill_in_sequence() {
        assert_eq!(fill_delay_ms(0, 200), 0);
        assert_eq!(fill_delay_ms(3, 200), 600);
        assert_eq!(fill_delay_ms(usize::MAX, 200), u32::MAX);
    }
}
