use std::cell::RefCell;
use std::rc::Rc;

use chrono::Local;
use gloo::timers::callback::Interval;
use shared::presenter::nav_entries;
use shared::{present, CycleGuard, EventsView, FetchFailure, PresenterSettings};
use yew::prelude::*;

use crate::components::header::Header;
use crate::components::month_nav::MonthNav;
use crate::components::month_section::MonthSection;
use crate::components::status::{ErrorNotice, Loading, NoEvents};
use crate::services::api::EventsService;

#[derive(Clone, PartialEq)]
enum WidgetState {
    Loading,
    Ready(EventsView),
    Failed(FetchFailure),
}

#[derive(Properties, PartialEq)]
pub struct EventsPageProps {
    #[prop_or_default]
    pub settings: PresenterSettings,
}

/// Run one fetch → present → render cycle unless one is already running.
fn run_cycle(
    state: UseStateHandle<WidgetState>,
    guard: Rc<RefCell<CycleGuard>>,
    settings: PresenterSettings,
) {
    let ticket = {
        let mut guard = guard.borrow_mut();
        match guard.begin() {
            Some(ticket) => ticket,
            None => {
                // Still waiting after a whole interval; give up on it so the
                // next tick starts over.
                tracing::warn!("Previous events refresh still pending, skipping this tick");
                guard.abandon();
                return;
            }
        }
    };

    wasm_bindgen_futures::spawn_local(async move {
        let next = match EventsService::fetch_events(&settings.events_path).await {
            Ok(payload) => {
                let today = Local::now().date_naive();
                WidgetState::Ready(present(payload, &settings, today, &Local))
            }
            Err(failure) => {
                tracing::error!("Failed to fetch events: {}", failure);
                WidgetState::Failed(failure)
            }
        };

        if guard.borrow_mut().complete(ticket) {
            state.set(next);
        } else {
            tracing::debug!(seq = ticket.seq(), "Discarding stale events refresh");
        }
    });
}

#[function_component(EventsPage)]
pub fn events_page(props: &EventsPageProps) -> Html {
    let state = use_state(|| WidgetState::Loading);
    let guard = use_mut_ref(CycleGuard::new);

    {
        let state = state.clone();
        let guard = guard.clone();
        let settings = props.settings.clone();

        use_effect_with((), move |_| {
            run_cycle(state.clone(), guard.clone(), settings.clone());

            let refresh_ms = settings.refresh_interval_secs.saturating_mul(1000);
            let interval = {
                let guard = guard.clone();
                Interval::new(refresh_ms, move || {
                    run_cycle(state.clone(), guard.clone(), settings.clone());
                })
            };

            move || {
                drop(interval);
                guard.borrow_mut().abandon();
            }
        });
    }

    let content = match &*state {
        WidgetState::Loading => html! { <Loading /> },
        WidgetState::Failed(failure) => html! { <ErrorNotice failure={failure.clone()} /> },
        WidgetState::Ready(EventsView::Empty) => html! { <NoEvents /> },
        WidgetState::Ready(EventsView::Months(groups)) => html! {
            <>
                <MonthNav entries={nav_entries(groups)} />
                { for groups.iter().map(|group| html! {
                    <MonthSection key={group.anchor_id()} group={group.clone()} />
                })}
            </>
        },
    };

    html! {
        <div class="events-widget">
            <Header />
            <div id="events-container">
                { content }
            </div>
        </div>
    }
}
