// src/state.rs
use crate::services::session::SessionId;
use crate::services::voice::VoiceCapture;

/// Per-client conversational state. Created with the client, mutated by
/// each turn, dropped with the client.
#[derive(Debug)]
pub struct ClientState {
    session_id: SessionId,
    voice_active: bool,
    pub capture: VoiceCapture,
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new(SessionId::generate())
    }
}

impl ClientState {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            voice_active: false,
            capture: VoiceCapture::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Mark the current turn as spoken input.
    pub fn activate_voice(&mut self) {
        self.voice_active = true;
    }

    pub fn is_voice_active(&self) -> bool {
        self.voice_active
    }

    /// Read and clear the voice flag in one step.
    pub fn take_voice(&mut self) -> bool {
        std::mem::take(&mut self.voice_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_flag_is_single_use() {
        let mut state = ClientState::default();
        assert!(!state.take_voice());
        state.activate_voice();
        state.activate_voice();
        assert!(state.is_voice_active());
        assert!(state.take_voice());
        assert!(!state.take_voice());
    }

    #[test]
    fn session_id_is_kept() {
        let state = ClientState::new(SessionId::from_raw("session_fixed0001"));
        assert_eq!(state.session_id().as_str(), "session_fixed0001");
    }
}
