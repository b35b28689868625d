mod command;
pub use command::Command;

mod event_type;
pub use event_type::EventType;

mod envelope;
pub use envelope::Envelope;

mod frame;
pub use frame::*;

pub mod event;
pub use event::Inbound;
