//! Haptic feedback

/// Pulse patterns a device can play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticKind {
    /// Short crisp tap
    Click,
}

/// Platform haptic collaborator (fire-and-forget)
pub trait HapticDevice {
    fn pulse(&mut self, kind: HapticKind);
}

/// Device without a motor; pulses are logged
#[derive(Debug, Default)]
pub struct LogHaptics;

impl HapticDevice for LogHaptics {
    fn pulse(&mut self, kind: HapticKind) {
        log::trace!("haptic {:?}", kind);
    }
}
