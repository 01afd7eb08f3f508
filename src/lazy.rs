use log::{debug, info, warn};
use web_sys::{Document, Element};

use crate::dom;
use crate::error::Result;
use crate::observer::ObserverOptions;
use crate::reveal::dom::DomTracker;
use crate::reveal::{Grouping, Reveal, RevealPolicy};

const LAZY_CLASS: &str = "lazy";

fn load(element: &Element, _reveal: &Reveal) {
    let Some(src) = element.get_attribute("data-src") else {
        return;
    };
    if let Err(e) = element.set_attribute("src", &src) {
        warn!("Failed to load lazy image {}: {:?}", src, e);
        return;
    }
    let _ = element.class_list().remove_1(LAZY_CLASS);
    debug!("Loaded lazy image {}", src);
}

/// Swaps `data-src` into `src` the first time each image scrolls into view.
pub fn install(document: &Document) -> Result<Option<DomTracker>> {
    let images = dom::query_all(document, "img[data-src]")?;
    if images.is_empty() {
        debug!("No lazy images on page");
        return Ok(None);
    }

    let tracker = DomTracker::new(RevealPolicy::default(), &ObserverOptions::default(), true, load)?;
    for image in images {
        tracker.register(image, Grouping::Single);
    }
    info!("Lazy loading {} images", tracker.len());
    Ok(Some(tracker))
}
