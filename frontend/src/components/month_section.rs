use shared::MonthGroup;
use yew::prelude::*;

use crate::components::event_card::EventCard;

#[derive(Properties, PartialEq)]
pub struct MonthSectionProps {
    pub group: MonthGroup,
}

#[function_component(MonthSection)]
pub fn month_section(props: &MonthSectionProps) -> Html {
    let group = &props.group;

    html! {
        <section class="month-group" id={group.anchor_id()}>
            <h2 class="month-title">{ &group.label }</h2>
            <div class="event-list">
                { for group.events.iter().map(|event| html! {
                    <EventCard event={event.clone()} />
                })}
            </div>
        </section>
    }
}
