use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, info, warn};
use web_sys::{Document, Element};

use super::{
    Grouping, ObservationFacility, Reveal, RevealPolicy, SiblingIndex, TrackedId, Tracker,
    ViewportBatch, ViewportEvent,
};
use crate::config::EffectsConfig;
use crate::dom;
use crate::error::Result;
use crate::observer::{ObserverOptions, ViewportObserver};

pub const REVEAL_MARKER_CLASS: &str = "scroll-reveal";
pub const REVEALED_CLASS: &str = "revealed";

type Elements = Rc<RefCell<Vec<Element>>>;

/// `IntersectionObserver`-backed facility. Ids index into the shared element list.
pub struct BrowserFacility {
    observer: ViewportObserver,
    elements: Elements,
}

impl ObservationFacility for BrowserFacility {
    fn observe(&mut self, id: TrackedId) {
        if let Some(element) = self.elements.borrow().get(id.index()) {
            self.observer.observe(element);
        }
    }

    fn unobserve(&mut self, id: TrackedId) {
        if let Some(element) = self.elements.borrow().get(id.index()) {
            self.observer.unobserve(element);
        }
    }
}

struct Siblings<'a>(&'a [Element]);

impl SiblingIndex for Siblings<'_> {
    fn sibling_index(&self, id: TrackedId) -> Option<usize> {
        let element = self.0.get(id.index())?;
        let children = element.parent_element()?.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .position(|child| &child == element)
    }
}

/// A [`Tracker`] wired to the live page.
pub struct DomTracker {
    tracker: Rc<RefCell<Tracker<BrowserFacility>>>,
    elements: Elements,
}

impl DomTracker {
    pub fn new<F>(
        policy: RevealPolicy,
        options: &ObserverOptions,
        release_on_reveal: bool,
        mut on_reveal: F,
    ) -> Result<Self>
    where
        F: FnMut(&Element, &Reveal) + 'static,
    {
        let elements: Elements = Rc::new(RefCell::new(Vec::new()));
        let slot: Rc<OnceCell<Weak<RefCell<Tracker<BrowserFacility>>>>> = Rc::new(OnceCell::new());

        let observer = ViewportObserver::new(options, {
            let slot = slot.clone();
            let elements = elements.clone();
            move |entries| {
                let Some(tracker) = slot.get().and_then(Weak::upgrade) else {
                    return;
                };

                let reveals = {
                    let elements = elements.borrow();
                    let batch: ViewportBatch = entries
                        .iter()
                        .filter_map(|entry| {
                            let target = entry.target();
                            let index = elements.iter().position(|element| *element == target)?;
                            Some(ViewportEvent {
                                target: TrackedId(index),
                                is_intersecting: entry.is_intersecting(),
                                intersection_ratio: entry.intersection_ratio(),
                            })
                        })
                        .collect();

                    let mut tracker = tracker.borrow_mut();
                    tracker.enqueue(batch);
                    tracker.drain(&Siblings(&elements))
                };

                let elements = elements.borrow();
                for reveal in &reveals {
                    if let Some(element) = elements.get(reveal.target.index()) {
                        on_reveal(element, reveal);
                    }
                }
            }
        })?;

        let mut tracker = Tracker::new(
            BrowserFacility {
                observer,
                elements: elements.clone(),
            },
            policy,
        );
        if release_on_reveal {
            tracker = tracker.release_on_reveal();
        }
        let tracker = Rc::new(RefCell::new(tracker));
        let _ = slot.set(Rc::downgrade(&tracker));

        Ok(Self { tracker, elements })
    }

    pub fn register(&self, element: Element, grouping: Grouping) -> TrackedId {
        self.elements.borrow_mut().push(element);
        self.tracker.borrow_mut().register_one(grouping)
    }

    pub fn len(&self) -> usize {
        self.tracker.borrow().len()
    }
}

fn grouping_for(element: &Element, staggered_classes: &[String]) -> Grouping {
    let classes = element.class_list();
    if staggered_classes.iter().any(|class| classes.contains(class)) {
        Grouping::Staggered
    } else {
        Grouping::Single
    }
}

fn show(element: &Element, reveal: &Reveal) {
    if let Err(e) = element.class_list().add_1(REVEALED_CLASS) {
        warn!("Failed to mark element revealed: {:?}", e);
        return;
    }
    if let Some(delay) = reveal.delay {
        let value = format!("{}s", delay.as_secs_f64());
        if let Err(e) = dom::set_style(element, "animation-delay", &value) {
            warn!("Failed to set animation delay: {}", e);
        }
    }
    debug!("Revealed element {:?} (delay {:?})", reveal.target, reveal.delay);
}

/// Registers the startup snapshot of reveal targets.
pub fn install(document: &Document, config: &EffectsConfig) -> Result<DomTracker> {
    let policy = config.reveal_policy();
    let options = ObserverOptions {
        threshold: policy.threshold,
        root_margin: policy.root_margin(),
    };
    let tracker = DomTracker::new(policy, &options, false, show)?;

    for element in dom::query_all(document, &config.reveal_selector())? {
        element.class_list().add_1(REVEAL_MARKER_CLASS)?;
        let grouping = grouping_for(&element, &config.staggered_classes);
        tracker.register(element, grouping);
    }

    info!("Scroll reveal tracking {} elements", tracker.len());
    Ok(tracker)
}
