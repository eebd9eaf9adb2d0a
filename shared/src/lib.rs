//! Types and presentation logic shared by the events relay and the widget.

pub mod api;
pub mod cycle;
pub mod format;
pub mod models;
pub mod presenter;

pub use api::FetchFailure;
pub use cycle::{CycleGuard, CycleTicket};
pub use models::{DisplayEvent, MonthGroup, NavEntry, PresenterSettings, RawEventRecord};
pub use presenter::{present, EventsView};
