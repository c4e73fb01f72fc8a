//! Audible confirmation

#[cfg(target_os = "windows")]
use windows::Win32::System::Diagnostics::Debug::MessageBeep;
#[cfg(target_os = "windows")]
use windows::Win32::UI::WindowsAndMessaging::MESSAGEBOX_STYLE;

pub trait Feedback {
    /// Signal that an action inside a dialog took effect
    fn confirm(&self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn confirm(&self) {}
}

/// Simple system beep
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBeep;

impl Feedback for SystemBeep {
    #[cfg(target_os = "windows")]
    fn confirm(&self) {
        if let Err(e) = unsafe { MessageBeep(MESSAGEBOX_STYLE(u32::MAX)) } {
            tracing::debug!("MessageBeep failed: {}", e);
        }
    }

    #[cfg(not(target_os = "windows"))]
    fn confirm(&self) {
        tracing::debug!("Beep requested (no system sound on this platform)");
    }
}
