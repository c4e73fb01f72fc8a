//! Modifier key state
//!
//! Holding shift or alt/option while the host opens a file forces the
//! import dialog even when the stored preferences would skip it.

#[cfg(target_os = "windows")]
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, VIRTUAL_KEY, VK_LMENU, VK_LSHIFT, VK_RMENU, VK_RSHIFT,
};

pub trait ModifierKeys {
    /// True while either shift key or either alt/option key is down
    fn override_held(&self) -> bool;
}

/// Fixed answer, for automation and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedModifiers(pub bool);

impl ModifierKeys for FixedModifiers {
    fn override_held(&self) -> bool {
        self.0
    }
}

/// Asks the OS for the live keyboard state
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemModifiers;

#[cfg(target_os = "windows")]
fn key_is_down(key: VIRTUAL_KEY) -> bool {
    // High bit set means the key is currently down.
    let state = unsafe { GetAsyncKeyState(i32::from(key.0)) };
    (state as u16) & 0x8000 != 0
}

impl ModifierKeys for SystemModifiers {
    #[cfg(target_os = "windows")]
    fn override_held(&self) -> bool {
        [VK_LSHIFT, VK_RSHIFT, VK_LMENU, VK_RMENU]
            .into_iter()
            .any(key_is_down)
    }

    #[cfg(not(target_os = "windows"))]
    fn override_held(&self) -> bool {
        false
    }
}
