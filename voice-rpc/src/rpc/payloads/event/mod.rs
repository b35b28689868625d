mod event;
pub use event::Inbound;

mod event_data;
pub use event_data::*;
