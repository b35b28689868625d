mod voice_state;
pub use voice_state::VoiceState;

mod voice_state_record;
pub use voice_state_record::VoiceStateRecord;
