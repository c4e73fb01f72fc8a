//! Win32 dialog backend
//!
//! Runs the `OUTDIALOG` and `INDIALOG` templates from the plug-in's
//! resources. The session pointer travels in the `WM_INITDIALOG` parameter
//! and is kept in the window's user data for later messages.

use super::layout::{center_dialog, title_button_width, Rect};
use super::{
    DialogError, DialogHost, DialogOutcome, ExportDialogSession, ImportDialogSession, Toggle,
};
use crate::options::AlphaMode;
use std::path::PathBuf;
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::{BOOL, HINSTANCE, HWND, LPARAM, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::UI::Controls::Dialogs::{
    GetSaveFileNameW, OFN_HIDEREADONLY, OFN_LONGNAMES, OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST,
    OPENFILENAMEW,
};
use windows::Win32::UI::Input::KeyboardAndMouse::EnableWindow;
use windows::Win32::UI::WindowsAndMessaging::{
    DialogBoxParamW, EndDialog, GetClientRect, GetDesktopWindow, GetDlgItem, GetParent,
    GetSystemMetrics, GetWindowLongPtrW, GetWindowLongW, GetWindowRect, SendMessageW,
    SetWindowLongPtrW, SetWindowPos, BM_GETCHECK, BM_SETCHECK, CB_ADDSTRING, CB_GETCURSEL,
    CB_SETCURSEL, GWLP_USERDATA, GWL_STYLE, IDCANCEL, IDOK, SM_CXSCREEN, SM_CXSIZE,
    SM_CYSCREEN, SWP_NOZORDER, WM_COMMAND, WM_INITDIALOG, WS_SYSMENU,
};

// Export dialog controls
const OUT_COMPRESSION_MENU: i32 = 3;
const OUT_LUMI_CHROM_CHECK: i32 = 4;
const OUT_FLOAT_CHECK: i32 = 5;
const OUT_COMPOSITE_CHECK: i32 = 6;
const OUT_HIDDEN_LAYERS_CHECK: i32 = 7;

// Import dialog controls
const IN_SET_DEFAULTS: i32 = 3;
const IN_TRANSPARENCY_RADIO: i32 = 4;
const IN_SEPARATE_RADIO: i32 = 5;
const IN_UNMULT_CHECK: i32 = 6;
const IN_IGNORE_LAYERTEXT_CHECK: i32 = 7;
const IN_MEMORY_MAP_CHECK: i32 = 8;
const IN_ALWAYS_DIALOG_CHECK: i32 = 9;

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Native modal dialogs owned by the host window
pub struct Win32Dialogs {
    instance: HINSTANCE,
    owner: HWND,
}

impl Win32Dialogs {
    /// `instance` is the plug-in module holding the dialog templates
    pub fn new(instance: HINSTANCE, owner: HWND) -> Self {
        Self { instance, owner }
    }

    fn run_modal(
        &self,
        template: &str,
        proc: unsafe extern "system" fn(HWND, u32, WPARAM, LPARAM) -> isize,
        param: isize,
    ) -> Result<DialogOutcome, DialogError> {
        let name = wide(template);
        let result = unsafe {
            DialogBoxParamW(
                self.instance,
                PCWSTR(name.as_ptr()),
                self.owner,
                Some(proc),
                LPARAM(param),
            )
        };

        match result {
            r if r == IDOK.0 as isize => Ok(DialogOutcome::Confirmed),
            r if r == IDCANCEL.0 as isize => Ok(DialogOutcome::Cancelled),
            other => Err(DialogError::Unavailable(format!(
                "DialogBoxParamW({}) returned {}",
                template, other
            ))),
        }
    }

    /// Ask for the destination of a layered export.
    pub fn save_as_prompt(&self) -> Option<PathBuf> {
        let mut file = [0u16; 1024];
        let mut file_title = [0u16; 256];
        let filter: Vec<u16> = "OpenEXR (*.exr)\0*.exr\0\0".encode_utf16().collect();
        let title = wide("OpenEXR Layer Export");
        let default_ext = wide("exr");

        let mut ofn = OPENFILENAMEW {
            lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
            hwndOwner: self.owner,
            hInstance: self.instance,
            lpstrFilter: PCWSTR(filter.as_ptr()),
            lpstrFile: PWSTR(file.as_mut_ptr()),
            nMaxFile: file.len() as u32,
            lpstrFileTitle: PWSTR(file_title.as_mut_ptr()),
            nMaxFileTitle: file_title.len() as u32,
            lpstrTitle: PCWSTR(title.as_ptr()),
            lpstrDefExt: PCWSTR(default_ext.as_ptr()),
            Flags: OFN_LONGNAMES | OFN_HIDEREADONLY | OFN_PATHMUSTEXIST | OFN_OVERWRITEPROMPT,
            ..Default::default()
        };

        if !unsafe { GetSaveFileNameW(&mut ofn) }.as_bool() {
            return None;
        }

        let len = file.iter().position(|&c| c == 0).unwrap_or(file.len());
        Some(PathBuf::from(String::from_utf16_lossy(&file[..len])))
    }
}

impl DialogHost for Win32Dialogs {
    fn run_export(
        &mut self,
        session: &mut ExportDialogSession,
    ) -> Result<DialogOutcome, DialogError> {
        let param = session as *mut ExportDialogSession as isize;
        self.run_modal("OUTDIALOG", export_proc, param)
    }

    fn run_import(
        &mut self,
        session: &mut ImportDialogSession<'_>,
    ) -> Result<DialogOutcome, DialogError> {
        let param = session as *mut ImportDialogSession<'_> as isize;
        self.run_modal("INDIALOG", import_proc, param)
    }
}

unsafe fn center_on_parent(dialog: HWND) {
    let mut parent = GetParent(dialog);
    if parent.0 == 0 {
        parent = GetDesktopWindow();
    }

    let mut client = RECT::default();
    if GetClientRect(parent, &mut client).is_err() {
        return;
    }
    let mut top_left = POINT {
        x: client.left,
        y: client.top,
    };
    let mut bottom_right = POINT {
        x: client.right,
        y: client.bottom,
    };
    let _ = ClientToScreen(parent, &mut top_left);
    let _ = ClientToScreen(parent, &mut bottom_right);

    let mut window = RECT::default();
    if GetWindowRect(dialog, &mut window).is_err() {
        return;
    }
    let width = window.right - window.left;
    let height = window.bottom - window.top;

    let has_system_menu = (GetWindowLongW(dialog, GWL_STYLE) as u32) & WS_SYSMENU.0 != 0;
    let title_bits = title_button_width(GetSystemMetrics(SM_CXSIZE), has_system_menu);

    let (x, y) = center_dialog(
        Rect::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y),
        width,
        height,
        GetSystemMetrics(SM_CXSCREEN),
        GetSystemMetrics(SM_CYSCREEN),
        title_bits,
    );
    let _ = SetWindowPos(dialog, HWND::default(), x, y, width, height, SWP_NOZORDER);
}

unsafe fn set_check(dialog: HWND, id: i32, checked: bool) {
    SendMessageW(
        GetDlgItem(dialog, id),
        BM_SETCHECK,
        WPARAM(usize::from(checked)),
        LPARAM(0),
    );
}

unsafe fn is_checked(dialog: HWND, id: i32) -> bool {
    SendMessageW(GetDlgItem(dialog, id), BM_GETCHECK, WPARAM(0), LPARAM(0)).0 == 1
}

unsafe fn enable(dialog: HWND, id: i32, enabled: bool) {
    let _ = EnableWindow(GetDlgItem(dialog, id), BOOL::from(enabled));
}

unsafe fn show_toggle(dialog: HWND, id: i32, toggle: Toggle) {
    set_check(dialog, id, toggle.checked);
    enable(dialog, id, toggle.enabled);
}

unsafe fn session_ptr<T>(dialog: HWND) -> Option<*mut T> {
    let ptr = GetWindowLongPtrW(dialog, GWLP_USERDATA) as *mut T;
    (!ptr.is_null()).then_some(ptr)
}

fn command_id(wparam: WPARAM) -> i32 {
    (wparam.0 & 0xffff) as i32
}

unsafe extern "system" fn export_proc(
    dialog: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> isize {
    match message {
        WM_INITDIALOG => {
            SetWindowLongPtrW(dialog, GWLP_USERDATA, lparam.0);
            center_on_parent(dialog);
            let session = &*(lparam.0 as *const ExportDialogSession);

            let menu = GetDlgItem(dialog, OUT_COMPRESSION_MENU);
            for (_, label) in ExportDialogSession::compression_items() {
                let label = wide(label);
                SendMessageW(menu, CB_ADDSTRING, WPARAM(0), LPARAM(label.as_ptr() as isize));
            }
            SendMessageW(
                menu,
                CB_SETCURSEL,
                WPARAM(session.compression_index()),
                LPARAM(0),
            );

            show_toggle(dialog, OUT_LUMI_CHROM_CHECK, session.luminance_chroma());
            show_toggle(dialog, OUT_FLOAT_CHECK, session.float_not_half());
            show_toggle(dialog, OUT_COMPOSITE_CHECK, session.composite());
            show_toggle(dialog, OUT_HIDDEN_LAYERS_CHECK, session.hidden_layers());
            1
        }
        WM_COMMAND => {
            let Some(ptr) = session_ptr::<ExportDialogSession>(dialog) else {
                return 0;
            };
            let session = &mut *ptr;

            match command_id(wparam) {
                id if id == IDOK.0 => {
                    let menu = GetDlgItem(dialog, OUT_COMPRESSION_MENU);
                    let selected = SendMessageW(menu, CB_GETCURSEL, WPARAM(0), LPARAM(0)).0;
                    if selected >= 0 {
                        session.select_compression_index(selected as usize);
                    }
                    session.set_luminance_chroma(is_checked(dialog, OUT_LUMI_CHROM_CHECK));
                    session.set_float(is_checked(dialog, OUT_FLOAT_CHECK));
                    session.set_composite(is_checked(dialog, OUT_COMPOSITE_CHECK));
                    session.set_hidden_layers(is_checked(dialog, OUT_HIDDEN_LAYERS_CHECK));
                    let _ = EndDialog(dialog, IDOK.0 as isize);
                    1
                }
                id if id == IDCANCEL.0 => {
                    let _ = EndDialog(dialog, IDCANCEL.0 as isize);
                    1
                }
                OUT_LUMI_CHROM_CHECK => {
                    session.set_luminance_chroma(is_checked(dialog, OUT_LUMI_CHROM_CHECK));
                    enable(dialog, OUT_FLOAT_CHECK, session.float_not_half().enabled);
                    1
                }
                _ => 0,
            }
        }
        _ => 0,
    }
}

unsafe fn show_alpha_mode(dialog: HWND, mode: AlphaMode) {
    set_check(dialog, IN_TRANSPARENCY_RADIO, mode == AlphaMode::Transparency);
    set_check(dialog, IN_SEPARATE_RADIO, mode == AlphaMode::Separate);
    enable(dialog, IN_UNMULT_CHECK, mode == AlphaMode::Separate);
}

unsafe fn read_import_controls(dialog: HWND, session: &mut ImportDialogSession<'_>) {
    let mode = if is_checked(dialog, IN_TRANSPARENCY_RADIO) {
        AlphaMode::Transparency
    } else {
        AlphaMode::Separate
    };
    session.select_alpha_mode(mode);
    session.set_unmult(is_checked(dialog, IN_UNMULT_CHECK));
    session.set_ignore_layer_text(is_checked(dialog, IN_IGNORE_LAYERTEXT_CHECK));
    session.set_memory_map(is_checked(dialog, IN_MEMORY_MAP_CHECK));
    session.set_always_dialog(is_checked(dialog, IN_ALWAYS_DIALOG_CHECK));
}

unsafe extern "system" fn import_proc(
    dialog: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> isize {
    match message {
        WM_INITDIALOG => {
            SetWindowLongPtrW(dialog, GWLP_USERDATA, lparam.0);
            center_on_parent(dialog);
            let session = &*(lparam.0 as *const ImportDialogSession<'_>);

            show_alpha_mode(dialog, session.alpha_mode());
            set_check(dialog, IN_UNMULT_CHECK, session.unmult().checked);
            set_check(
                dialog,
                IN_IGNORE_LAYERTEXT_CHECK,
                session.ignore_layer_text().checked,
            );
            set_check(dialog, IN_MEMORY_MAP_CHECK, session.memory_map().checked);
            set_check(
                dialog,
                IN_ALWAYS_DIALOG_CHECK,
                session.always_dialog().checked,
            );
            1
        }
        WM_COMMAND => {
            let Some(ptr) = session_ptr::<ImportDialogSession<'_>>(dialog) else {
                return 0;
            };
            let session = &mut *ptr;

            match command_id(wparam) {
                id if id == IDOK.0 => {
                    read_import_controls(dialog, session);
                    let _ = EndDialog(dialog, IDOK.0 as isize);
                    1
                }
                id if id == IDCANCEL.0 => {
                    let _ = EndDialog(dialog, IDCANCEL.0 as isize);
                    1
                }
                IN_SET_DEFAULTS => {
                    read_import_controls(dialog, session);
                    let _ = session.set_current_as_defaults();
                    1
                }
                id @ (IN_TRANSPARENCY_RADIO | IN_SEPARATE_RADIO) => {
                    let mode = if id == IN_TRANSPARENCY_RADIO {
                        AlphaMode::Transparency
                    } else {
                        AlphaMode::Separate
                    };
                    session.select_alpha_mode(mode);
                    show_alpha_mode(dialog, mode);
                    1
                }
                _ => 0,
            }
        }
        _ => 0,
    }
}
