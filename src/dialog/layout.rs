//! Dialog placement
//!
//! Dialogs open centered over the host window, a third of the way down,
//! and never off screen.

/// Screen rectangle, right/bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Width of the caption buttons the dialog is shifted left by.
///
/// Assumes three caption bitmaps; without a system menu one third less.
pub fn title_button_width(caption_button_width: i32, has_system_menu: bool) -> i32 {
    if has_system_menu {
        caption_button_width
    } else {
        caption_button_width - caption_button_width / 3
    }
}

/// Top-left corner for a `dialog_width` x `dialog_height` dialog over
/// `parent` on a `screen_width` x `screen_height` screen.
pub fn center_dialog(
    parent: Rect,
    dialog_width: i32,
    dialog_height: i32,
    screen_width: i32,
    screen_height: i32,
    title_bits: i32,
) -> (i32, i32) {
    let mut x = (parent.width() - dialog_width).max(0) / 2 + parent.left - title_bits;
    if x + dialog_width > screen_width {
        x = (screen_width - dialog_width).max(0);
    }

    let mut y = (parent.height() - dialog_height).max(0) / 3 + parent.top;
    if y + dialog_height > screen_height {
        y = (screen_height - dialog_height).max(0);
    }

    (x, y)
}
