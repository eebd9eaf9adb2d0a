use shared::FetchFailure;
use yew::prelude::*;

#[function_component(Loading)]
pub fn loading() -> Html {
    html! {
        <div class="loading">
            <div class="spinner"></div>
            <p>{ "Loading events..." }</p>
        </div>
    }
}

#[function_component(NoEvents)]
pub fn no_events() -> Html {
    html! {
        <div class="no-events">{ "No upcoming events found." }</div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorNoticeProps {
    pub failure: FetchFailure,
}

#[function_component(ErrorNotice)]
pub fn error_notice(props: &ErrorNoticeProps) -> Html {
    let failure = &props.failure;

    if !failure.is_likely_cross_origin() {
        return html! {
            <div class="error">{ failure.headline() }</div>
        };
    }

    html! {
        <div class="error">
            <h3>{ failure.headline() }</h3>
            <p>{ "This widget needs to be served alongside its events relay to load live events." }</p>
            <p><strong>{ "Options:" }</strong></p>
            <ul>
                { for failure.guidance().iter().map(|tip| html! { <li>{ *tip }</li> }) }
            </ul>
        </div>
    }
}
