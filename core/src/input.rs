//! Text input collaborator contract

/// The host's on-screen text input subsystem.
///
/// Backgrounding dismisses the software keyboard; the pump re-shows it on
/// foreground when input was active.
pub trait TextInput {
    /// Whether text input is currently active.
    fn is_active(&self) -> bool;
    /// Re-show the input UI. Show-only: the subsystem keeps its own state.
    fn start(&mut self);
}
