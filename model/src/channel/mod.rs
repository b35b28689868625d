mod channel;
pub use channel::Channel;

mod selected_channel;
pub use selected_channel::SelectedChannel;

mod channel_select;
pub use channel_select::ChannelSelect;
