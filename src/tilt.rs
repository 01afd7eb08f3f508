use log::info;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, MouseEvent};

use crate::dom::{self, Listener};
use crate::error::Result;

pub const REST_TRANSFORM: &str = "perspective(1000px) rotateX(0) rotateY(0) translateZ(0)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    /// Tilt for a pointer at (`x`, `y`) relative to the card's top-left corner.
    pub fn from_pointer(x: f64, y: f64, width: f64, height: f64, divisor: f64) -> Self {
        Self {
            rotate_x: (y - height / 2.0) / divisor,
            rotate_y: (width / 2.0 - x) / divisor,
        }
    }

    pub fn transform(&self) -> String {
        format!(
            "perspective(1000px) rotateX({}deg) rotateY({}deg) translateZ(10px)",
            self.rotate_x, self.rotate_y
        )
    }
}

pub fn install(document: &Document, divisor: f64) -> Result<Vec<Listener>> {
    let cards = dom::query_all(document, ".chapter-card, .resource-card")?;
    let mut listeners = Vec::with_capacity(cards.len() * 2);

    for card in &cards {
        listeners.push(Listener::new(card, "mousemove", {
            let card = card.clone();
            move |event: Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let rect = card.get_bounding_client_rect();
                let tilt = Tilt::from_pointer(
                    f64::from(event.client_x()) - rect.left(),
                    f64::from(event.client_y()) - rect.top(),
                    rect.width(),
                    rect.height(),
                    divisor,
                );
                let _ = dom::set_style(&card, "transform", &tilt.transform());
            }
        })?);
        listeners.push(Listener::new(card, "mouseleave", {
            let card = card.clone();
            move |_: Event| {
                let _ = dom::set_style(&card, "transform", REST_TRANSFORM);
            }
        })?);
    }

    info!("Hover tilt on {} cards", cards.len());
    Ok(listeners)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_is_flat() {
        let tilt = Tilt::from_pointer(150.0, 100.0, 300.0, 200.0, 10.0);
        assert_eq!(tilt, Tilt { rotate_x: 0.0, rotate_y: 0.0 });
    }

    #[test]
    fn corners_lean_towards_pointer() {
        let top_left = Tilt::from_pointer(0.0, 0.0, 300.0, 200.0, 10.0);
        assert_eq!(top_left, Tilt { rotate_x: -10.0, rotate_y: 15.0 });

        let bottom_right = Tilt::from_pointer(300.0, 200.0, 300.0, 200.0, 10.0);
        assert_eq!(bottom_right, Tilt { rotate_x: 10.0, rotate_y: -15.0 });
    }

    #[test]
    fn transform_string() {
        let tilt = Tilt { rotate_x: -2.5, rotate_y: 4.0 };
        assert_eq!(
            tilt.transform(),
            "perspective(1000px) rotateX(-2.5deg) rotateY(4deg) translateZ(10px)"
        );
    }
}
