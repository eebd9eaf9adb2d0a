use shared::NavEntry;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct MonthNavProps {
    pub entries: Vec<NavEntry>,
}

fn scroll_to(anchor_id: &str) {
    let target = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(anchor_id));
    match target {
        Some(element) => element.scroll_into_view(),
        None => tracing::debug!("No month section with id {}", anchor_id),
    }
}

#[function_component(MonthNav)]
pub fn month_nav(props: &MonthNavProps) -> Html {
    if props.entries.is_empty() {
        return html! {};
    }

    html! {
        <nav class="month-nav">
            { for props.entries.iter().map(|entry| {
                let anchor_id = entry.anchor_id.clone();
                let onclick = Callback::from(move |_: MouseEvent| scroll_to(&anchor_id));

                html! {
                    <button class="month-nav-btn" key={entry.anchor_id.clone()} {onclick}>
                        { &entry.label }
                    </button>
                }
            })}
        </nav>
    }
}
