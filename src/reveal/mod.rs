//! Visibility-reveal tracking.
//!
//! Registered elements start hidden and are latched to revealed the first time the
//! observation facility reports them intersecting the viewport. Members of a
//! staggered group additionally get an animation delay proportional to their
//! position among their parent's children.
//!
//! The tracker is a plain state machine: the browser side feeds it batches through
//! [`Tracker::enqueue`] and applies the returned [`Reveal`]s to the DOM.

pub mod dom;

use std::collections::VecDeque;
use std::time::Duration;

/// Handle for a registered element, assigned in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackedId(usize);

impl TrackedId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Hidden,
    Revealed,
}

/// Whether an element cascades with its siblings when revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Single,
    Staggered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportEvent {
    pub target: TrackedId,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

impl ViewportEvent {
    pub fn entering(target: TrackedId) -> Self {
        Self {
            target,
            is_intersecting: true,
            intersection_ratio: 1.0,
        }
    }

    pub fn leaving(target: TrackedId) -> Self {
        Self {
            target,
            is_intersecting: false,
            intersection_ratio: 0.0,
        }
    }
}

pub type ViewportBatch = Vec<ViewportEvent>;

/// Per-element transition. `Revealed` is terminal.
pub fn reduce(state: RevealState, event: &ViewportEvent) -> RevealState {
    match state {
        RevealState::Hidden if event.is_intersecting => RevealState::Revealed,
        state => state,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealPolicy {
    /// Fraction of the element's area that must be visible.
    pub threshold: f64,
    /// How far above the viewport's bottom edge the trigger line sits.
    pub bottom_margin_px: u32,
    pub stagger_step: Duration,
}

impl Default for RevealPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin_px: 50,
            stagger_step: Duration::from_millis(100),
        }
    }
}

impl RevealPolicy {
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin_px)
    }

    pub fn stagger_delay(&self, sibling_index: usize) -> Duration {
        let index = u32::try_from(sibling_index).unwrap_or(u32::MAX);
        self.stagger_step.saturating_mul(index)
    }
}

/// The platform capability that reports viewport intersections.
pub trait ObservationFacility {
    fn observe(&mut self, id: TrackedId);
    fn unobserve(&mut self, id: TrackedId);
}

/// Answers where an element sits among its parent's direct children.
/// `None` when the element is detached.
pub trait SiblingIndex {
    fn sibling_index(&self, id: TrackedId) -> Option<usize>;
}

/// A reveal transition to apply to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    pub target: TrackedId,
    pub delay: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
struct TrackedElement {
    state: RevealState,
    grouping: Grouping,
    observed: bool,
    delay: Option<Duration>,
}

pub struct Tracker<O> {
    facility: O,
    policy: RevealPolicy,
    elements: Vec<TrackedElement>,
    inbox: VecDeque<ViewportBatch>,
    release_on_reveal: bool,
}

impl<O: ObservationFacility> Tracker<O> {
    pub fn new(facility: O, policy: RevealPolicy) -> Self {
        Self {
            facility,
            policy,
            elements: Vec::new(),
            inbox: VecDeque::new(),
            release_on_reveal: false,
        }
    }

    /// Stop observing each element as soon as it has been revealed.
    pub fn release_on_reveal(mut self) -> Self {
        self.release_on_reveal = true;
        self
    }

    pub fn facility(&self) -> &O {
        &self.facility
    }

    pub fn register<I>(&mut self, elements: I) -> Vec<TrackedId>
    where
        I: IntoIterator<Item = Grouping>,
    {
        elements
            .into_iter()
            .map(|grouping| self.register_one(grouping))
            .collect()
    }

    pub fn register_one(&mut self, grouping: Grouping) -> TrackedId {
        let id = TrackedId(self.elements.len());
        self.elements.push(TrackedElement {
            state: RevealState::Hidden,
            grouping,
            observed: true,
            delay: None,
        });
        self.facility.observe(id);
        id
    }

    /// Stops observation. Events that still arrive for `id` are ignored.
    pub fn unregister(&mut self, id: TrackedId) {
        if let Some(element) = self.elements.get_mut(id.index()) {
            if element.observed {
                element.observed = false;
                self.facility.unobserve(id);
            }
        }
    }

    pub fn enqueue(&mut self, batch: ViewportBatch) {
        self.inbox.push_back(batch);
    }

    /// Applies every queued batch in arrival order and returns the new reveals.
    pub fn drain(&mut self, layout: &impl SiblingIndex) -> Vec<Reveal> {
        let mut reveals = Vec::new();
        while let Some(batch) = self.inbox.pop_front() {
            for event in &batch {
                if let Some(reveal) = self.apply(event, layout) {
                    reveals.push(reveal);
                }
            }
        }
        reveals
    }

    fn apply(&mut self, event: &ViewportEvent, layout: &impl SiblingIndex) -> Option<Reveal> {
        let id = event.target;
        let policy = self.policy;
        let element = self.elements.get_mut(id.index())?;
        if !element.observed {
            return None;
        }

        let before = element.state;
        element.state = reduce(before, event);
        if before == element.state {
            return None;
        }

        if element.grouping == Grouping::Staggered {
            element.delay = layout
                .sibling_index(id)
                .map(|index| policy.stagger_delay(index));
        }
        let reveal = Reveal {
            target: id,
            delay: element.delay,
        };

        if self.release_on_reveal {
            self.unregister(id);
        }
        Some(reveal)
    }

    pub fn is_revealed(&self, id: TrackedId) -> bool {
        self.elements
            .get(id.index())
            .map_or(false, |element| element.state == RevealState::Revealed)
    }

    pub fn delay(&self, id: TrackedId) -> Option<Duration> {
        self.elements.get(id.index()).and_then(|element| element.delay)
    }

    pub fn is_observed(&self, id: TrackedId) -> bool {
        self.elements.get(id.index()).map_or(false, |element| element.observed)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
