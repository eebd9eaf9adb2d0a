pub mod event_card;
pub mod header;
pub mod month_nav;
pub mod month_section;
pub mod status;
