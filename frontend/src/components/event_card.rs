use shared::models::Navigation;
use shared::DisplayEvent;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct EventCardProps {
    pub event: DisplayEvent,
}

/// Open the event page in a new browsing context.
fn navigate(nav: &Navigation) {
    let opened = web_sys::window().map(|w| w.open_with_url_and_target(&nav.url, nav.target));
    if !matches!(opened, Some(Ok(_))) {
        tracing::warn!("Could not open {}", nav.url);
    }
}

#[function_component(EventCard)]
pub fn event_card(props: &EventCardProps) -> Html {
    let event = &props.event;

    let onclick = event.activation().map(|nav| {
        Callback::from(move |_: MouseEvent| {
            navigate(&nav);
        })
    });
    let class = classes!("event-item", onclick.is_some().then_some("clickable"));

    html! {
        <div class={class} {onclick}>
            if let Some(src) = &event.cover_image_url {
                <div class="event-cover-image">
                    <img src={src.clone()} alt={event.title.clone()} loading="lazy" />
                </div>
            }
            <div class="event-calendar">
                <span class="event-month">{ &event.date.month_short }</span>
                <span class="event-day">{ &event.date.day }</span>
                <span class="event-weekday">{ &event.date.weekday }</span>
                <span class="event-year">{ &event.date.year }</span>
            </div>
            <div class="event-content">
                <div class="event-title">{ &event.title }</div>
                <div class="event-date" title={event.date.long.clone()}>{ &event.date.time }</div>
                <div class="event-host">{ format!("Hosted by: {}", event.host) }</div>
                if let Some(desc) = &event.description {
                    <div class="event-description">{ desc }</div>
                }
                <div class="event-location">{ event.location.label() }</div>
            </div>
        </div>
    }
}
