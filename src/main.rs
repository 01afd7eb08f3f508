use log::{error, info};
use yew::prelude::*;

mod config;
mod dom;
mod easter_egg;
mod effects;
mod error;
mod form;
mod lazy;
mod nav;
mod observer;
mod page;
mod particles;
mod progress;
mod reveal;
mod tilt;
mod toggle;
mod typing;

use config::EffectsConfig;
use effects::Effects;
use page::Landing;

#[function_component]
fn App() -> Html {
    // Effects query the rendered page, so install them once after the first render
    use_effect_with_deps(
        move |_| {
            let installed = dom::document()
                .map(|document| EffectsConfig::load(&document))
                .and_then(|config| Effects::install(&config));

            let effects = match installed {
                Ok(effects) => Some(effects),
                Err(e) => {
                    error!("Failed to install page effects: {}", e);
                    None
                }
            };

            move || drop(effects)
        },
        (),
    );

    html! { <Landing /> }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting landing page");
    yew::Renderer::<App>::new().render();
}
