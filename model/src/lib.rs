mod snowflake;
pub use snowflake::Snowflake;

mod tristate;
pub use tristate::Tristate;

pub mod channel;
pub mod user;
pub mod voice;

mod util;
