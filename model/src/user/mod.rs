mod user;
pub use user::User;

mod partial_user;
pub use partial_user::PartialUser;

mod presence_state;
pub use presence_state::PresenceState;
