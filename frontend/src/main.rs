mod components;
mod pages;
mod services;

use shared::PresenterSettings;
use yew::prelude::*;

use crate::pages::events::EventsPage;

#[function_component(App)]
fn app() -> Html {
    html! {
        <div id="app">
            <EventsPage settings={PresenterSettings::default()} />
        </div>
    }
}

fn main() {
    // Initialize tracing
    tracing_wasm::set_as_global_default();

    yew::Renderer::<App>::new().render();
}
