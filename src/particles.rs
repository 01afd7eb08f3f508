use log::{debug, info};
use web_sys::js_sys::Math;
use web_sys::Document;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub size_px: f64,
    pub left_pct: f64,
    pub top_pct: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl Particle {
    /// Draws a particle from `random`, which must yield values in `[0, 1)`.
    pub fn sample(random: &mut impl FnMut() -> f64) -> Self {
        Self {
            size_px: random() * 4.0 + 2.0,
            left_pct: random() * 100.0,
            top_pct: random() * 100.0,
            duration_s: random() * 3.0 + 2.0,
            delay_s: random() * 2.0,
        }
    }

    pub fn style(&self) -> String {
        format!(
            "width: {size}px; height: {size}px; left: {}%; top: {}%; animation-duration: {}s; animation-delay: {}s;",
            self.left_pct,
            self.top_pct,
            self.duration_s,
            self.delay_s,
            size = self.size_px,
        )
    }
}

pub fn install(document: &Document, count: usize) -> Result<()> {
    let Some(hero) = document.query_selector(".hero")? else {
        debug!("No hero section, skipping particles");
        return Ok(());
    };

    let container = document.create_element("div")?;
    container.set_class_name("particles");
    hero.append_child(&container)?;

    let mut random = Math::random;
    for _ in 0..count {
        let particle = Particle::sample(&mut random);
        let element = document.create_element("div")?;
        element.set_class_name("particle");
        element.set_attribute("style", &particle.style())?;
        container.append_child(&element)?;
    }

    info!("Spawned {} background particles", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f64) -> impl FnMut() -> f64 {
        move || value
    }

    #[test]
    fn ranges_at_the_extremes() {
        let low = Particle::sample(&mut constant(0.0));
        assert_eq!(low.size_px, 2.0);
        assert_eq!(low.duration_s, 2.0);
        assert_eq!(low.delay_s, 0.0);

        let high = Particle::sample(&mut constant(0.999));
        assert!(high.size_px < 6.0);
        assert!(high.left_pct < 100.0);
        assert!(high.duration_s < 5.0);
        assert!(high.delay_s < 2.0);
    }

    #[test]
    fn draws_each_property_in_order() {
        let mut values = vec![0.5, 0.25, 0.75, 0.0, 1.0 / 2.0].into_iter();
        let particle = Particle::sample(&mut || values.next().unwrap());
        assert_eq!(
            particle,
            Particle {
                size_px: 4.0,
                left_pct: 25.0,
                top_pct: 75.0,
                duration_s: 2.0,
                delay_s: 1.0,
            }
        );
    }

    #[test]
    fn style_sets_square_size() {
        let particle = Particle::sample(&mut constant(0.5));
        assert_eq!(
            particle.style(),
            "width: 4px; height: 4px; left: 50%; top: 50%; animation-duration: 3.5s; animation-delay: 1s;"
        );
    }
}
