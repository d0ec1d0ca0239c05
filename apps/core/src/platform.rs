use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Opaque top-level window identifier. Only ever handed back to the same
/// capability that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WindowHandle(pub isize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsWindow {
    pub handle: WindowHandle,
    pub title: String,
}

/// Raw installed-program record as the OS reports it. Field-level filtering
/// (empty names, system components, release types) is the indexer's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryProgram {
    pub display_name: String,
    pub display_icon: String,
    pub system_component: u32,
    pub release_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsError {
    message: String,
}

impl OsError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for OsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OsError {}

/// Every OS-specific interaction the engine needs, behind one seam so the
/// core stays platform-agnostic and testable with a stub.
pub trait OsCapabilities: Send + Sync {
    /// Raw entries from the installed-application registry locations.
    /// A location that cannot be opened contributes nothing.
    fn enumerate_programs(&self) -> Vec<RegistryProgram>;

    /// Resolves a shortcut file to its target path.
    fn resolve_shortcut(&self, shortcut: &Path) -> Result<PathBuf, OsError>;

    /// Visible top-level windows with their titles. Untitled windows are
    /// the caller's problem to drop.
    fn enumerate_windows(&self) -> Vec<OsWindow>;

    /// Best effort: restore if minimized, then bring to the foreground.
    /// Returns false when the OS refuses; never an error.
    fn focus_window(&self, handle: WindowHandle) -> bool;
}

/// The real OS. Off Windows every capability is an empty no-op so the
/// engine still runs end to end.
#[derive(Debug, Default)]
pub struct NativeOs;

#[cfg(not(target_os = "windows"))]
impl OsCapabilities for NativeOs {
    fn enumerate_programs(&self) -> Vec<RegistryProgram> {
        Vec::new()
    }

    fn resolve_shortcut(&self, shortcut: &Path) -> Result<PathBuf, OsError> {
        Err(OsError::new(format!(
            "shortcut resolution unavailable on this platform: {}",
            shortcut.display()
        )))
    }

    fn enumerate_windows(&self) -> Vec<OsWindow> {
        Vec::new()
    }

    fn focus_window(&self, _handle: WindowHandle) -> bool {
        false
    }
}

#[cfg(target_os = "windows")]
impl OsCapabilities for NativeOs {
    fn enumerate_programs(&self) -> Vec<RegistryProgram> {
        windows_impl::enumerate_programs()
    }

    fn resolve_shortcut(&self, shortcut: &Path) -> Result<PathBuf, OsError> {
        windows_impl::resolve_shortcut(shortcut)
    }

    fn enumerate_windows(&self) -> Vec<OsWindow> {
        windows_impl::enumerate_windows()
    }

    fn focus_window(&self, handle: WindowHandle) -> bool {
        windows_impl::focus_window(handle)
    }
}

/// Canned capability for tests: fixed registry entries, a shortcut-target
/// map, a fixed window list, and a record of focus calls.
#[derive(Default)]
pub struct StubOs {
    pub programs: Vec<RegistryProgram>,
    pub shortcut_targets: BTreeMap<PathBuf, PathBuf>,
    pub windows: Vec<OsWindow>,
    pub focused: Mutex<Vec<WindowHandle>>,
}

impl OsCapabilities for StubOs {
    fn enumerate_programs(&self) -> Vec<RegistryProgram> {
        self.programs.clone()
    }

    fn resolve_shortcut(&self, shortcut: &Path) -> Result<PathBuf, OsError> {
        self.shortcut_targets
            .get(shortcut)
            .cloned()
            .ok_or_else(|| OsError::new(format!("no target for {}", shortcut.display())))
    }

    fn enumerate_windows(&self) -> Vec<OsWindow> {
        self.windows.clone()
    }

    fn focus_window(&self, handle: WindowHandle) -> bool {
        if let Ok(mut focused) = self.focused.lock() {
            focused.push(handle);
        }
        true
    }
}

#[cfg(target_os = "windows")]
mod windows_impl {
    use std::path::{Path, PathBuf};

    use windows_sys::core::GUID;
    use windows_sys::Win32::Foundation::{
        ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS, HWND, LPARAM,
    };
    use windows_sys::Win32::System::Registry::{
        RegCloseKey, RegEnumKeyExW, RegOpenKeyExW, RegQueryInfoKeyW, RegQueryValueExW, HKEY,
        HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_32KEY, REG_DWORD,
        REG_EXPAND_SZ, REG_SZ,
    };
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetWindowTextLengthW, GetWindowTextW, IsIconic, IsWindowVisible,
        SetForegroundWindow, ShowWindow, SW_RESTORE,
    };

    use super::{OsError, OsWindow, RegistryProgram, WindowHandle};

    const UNINSTALL_SUBKEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Uninstall";

    pub(super) fn enumerate_programs() -> Vec<RegistryProgram> {
        let mut entries = Vec::new();
        // Two privilege roots, each in the native and 32-on-64 registry views.
        let locations: [(HKEY, u32); 4] = [
            (HKEY_LOCAL_MACHINE, 0),
            (HKEY_LOCAL_MACHINE, KEY_WOW64_32KEY),
            (HKEY_CURRENT_USER, 0),
            (HKEY_CURRENT_USER, KEY_WOW64_32KEY),
        ];
        for (root, view_flags) in locations {
            collect_programs_from_hive(root, view_flags, &mut entries);
        }
        entries
    }

    fn collect_programs_from_hive(root: HKEY, view_flags: u32, out: &mut Vec<RegistryProgram>) {
        let subkey_wide = to_wide(UNINSTALL_SUBKEY);
        let mut uninstall_root: HKEY = std::ptr::null_mut();
        let open_status = unsafe {
            RegOpenKeyExW(
                root,
                subkey_wide.as_ptr(),
                0,
                KEY_READ | view_flags,
                &mut uninstall_root,
            )
        };
        if open_status != ERROR_SUCCESS {
            return;
        }

        let mut subkey_count = 0_u32;
        let mut max_subkey_len = 0_u32;
        let info_status = unsafe {
            RegQueryInfoKeyW(
                uninstall_root,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                &mut subkey_count,
                &mut max_subkey_len,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        if info_status != ERROR_SUCCESS {
            unsafe {
                RegCloseKey(uninstall_root);
            }
            return;
        }

        let mut name_buffer = vec![0_u16; max_subkey_len as usize + 2];
        for index in 0..subkey_count {
            let mut name_len = max_subkey_len + 1;
            let enum_status = unsafe {
                RegEnumKeyExW(
                    uninstall_root,
                    index,
                    name_buffer.as_mut_ptr(),
                    &mut name_len,
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                )
            };
            if enum_status == ERROR_NO_MORE_ITEMS {
                break;
            }
            if enum_status != ERROR_SUCCESS {
                continue;
            }

            let subkey_name = String::from_utf16_lossy(&name_buffer[..name_len as usize]);
            if let Some(entry) = read_program_entry(uninstall_root, view_flags, &subkey_name) {
                out.push(entry);
            }
        }

        unsafe {
            RegCloseKey(uninstall_root);
        }
    }

    fn read_program_entry(
        uninstall_root: HKEY,
        view_flags: u32,
        subkey_name: &str,
    ) -> Option<RegistryProgram> {
        let subkey_wide = to_wide(subkey_name);
        let mut app_key: HKEY = std::ptr::null_mut();
        let open_status = unsafe {
            RegOpenKeyExW(
                uninstall_root,
                subkey_wide.as_ptr(),
                0,
                KEY_READ | view_flags,
                &mut app_key,
            )
        };
        if open_status != ERROR_SUCCESS {
            return None;
        }

        let display_name = read_reg_string_value(app_key, "DisplayName").unwrap_or_default();
        let display_icon = read_reg_string_value(app_key, "DisplayIcon").unwrap_or_default();
        let release_type = read_reg_string_value(app_key, "ReleaseType").unwrap_or_default();
        let system_component = read_reg_dword_value(app_key, "SystemComponent").unwrap_or(0);

        unsafe {
            RegCloseKey(app_key);
        }

        Some(RegistryProgram {
            display_name,
            display_icon,
            system_component,
            release_type,
        })
    }

    fn read_reg_string_value(key: HKEY, value_name: &str) -> Option<String> {
        let value_name_wide = to_wide(value_name);
        let mut value_type = 0_u32;
        let mut size = 0_u32;
        let query_status = unsafe {
            RegQueryValueExW(
                key,
                value_name_wide.as_ptr(),
                std::ptr::null(),
                &mut value_type,
                std::ptr::null_mut(),
                &mut size,
            )
        };
        if query_status == ERROR_FILE_NOT_FOUND || query_status != ERROR_SUCCESS || size == 0 {
            return None;
        }
        if value_type != REG_SZ && value_type != REG_EXPAND_SZ {
            return None;
        }

        let mut buffer = vec![0_u8; size as usize];
        let read_status = unsafe {
            RegQueryValueExW(
                key,
                value_name_wide.as_ptr(),
                std::ptr::null(),
                &mut value_type,
                buffer.as_mut_ptr(),
                &mut size,
            )
        };
        if read_status != ERROR_SUCCESS {
            return None;
        }

        let mut wide = Vec::with_capacity(buffer.len() / 2);
        for chunk in buffer.chunks_exact(2) {
            wide.push(u16::from_le_bytes([chunk[0], chunk[1]]));
        }
        while wide.last().copied() == Some(0) {
            wide.pop();
        }
        let value = String::from_utf16_lossy(&wide).trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn read_reg_dword_value(key: HKEY, value_name: &str) -> Option<u32> {
        let value_name_wide = to_wide(value_name);
        let mut value_type = 0_u32;
        let mut size = std::mem::size_of::<u32>() as u32;
        let mut value = 0_u32;
        let status = unsafe {
            RegQueryValueExW(
                key,
                value_name_wide.as_ptr(),
                std::ptr::null(),
                &mut value_type,
                &mut value as *mut u32 as *mut u8,
                &mut size,
            )
        };
        if status != ERROR_SUCCESS || value_type != REG_DWORD {
            return None;
        }
        Some(value)
    }

    // IShellLinkW / IPersistFile, declared down to the methods used.
    const CLSID_SHELL_LINK: GUID = GUID {
        data1: 0x0002_1401,
        data2: 0,
        data3: 0,
        data4: [0xC0, 0, 0, 0, 0, 0, 0, 0x46],
    };
    const IID_ISHELL_LINK_W: GUID = GUID {
        data1: 0x0002_14F9,
        data2: 0,
        data3: 0,
        data4: [0xC0, 0, 0, 0, 0, 0, 0, 0x46],
    };
    const IID_IPERSIST_FILE: GUID = GUID {
        data1: 0x0000_010B,
        data2: 0,
        data3: 0,
        data4: [0xC0, 0, 0, 0, 0, 0, 0, 0x46],
    };

    #[repr(C)]
    struct IShellLinkWVtbl {
        query_interface: unsafe extern "system" fn(
            *mut std::ffi::c_void,
            *const GUID,
            *mut *mut std::ffi::c_void,
        ) -> i32,
        add_ref: unsafe extern "system" fn(*mut std::ffi::c_void) -> u32,
        release: unsafe extern "system" fn(*mut std::ffi::c_void) -> u32,
        get_path: unsafe extern "system" fn(
            *mut std::ffi::c_void,
            *mut u16,
            i32,
            *mut std::ffi::c_void,
            u32,
        ) -> i32,
    }

    #[repr(C)]
    struct IShellLinkW {
        vtbl: *const IShellLinkWVtbl,
    }

    #[repr(C)]
    struct IPersistFileVtbl {
        query_interface: unsafe extern "system" fn(
            *mut std::ffi::c_void,
            *const GUID,
            *mut *mut std::ffi::c_void,
        ) -> i32,
        add_ref: unsafe extern "system" fn(*mut std::ffi::c_void) -> u32,
        release: unsafe extern "system" fn(*mut std::ffi::c_void) -> u32,
        get_class_id: unsafe extern "system" fn(*mut std::ffi::c_void, *mut GUID) -> i32,
        is_dirty: unsafe extern "system" fn(*mut std::ffi::c_void) -> i32,
        load: unsafe extern "system" fn(*mut std::ffi::c_void, *const u16, u32) -> i32,
    }

    #[repr(C)]
    struct IPersistFile {
        vtbl: *const IPersistFileVtbl,
    }

    pub(super) fn resolve_shortcut(shortcut: &Path) -> Result<PathBuf, OsError> {
        use windows_sys::Win32::System::Com::{
            CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED,
        };

        let init_status = unsafe { CoInitializeEx(std::ptr::null(), COINIT_APARTMENTTHREADED) };
        if init_status < 0 {
            return Err(OsError::new(format!(
                "CoInitializeEx failed: {init_status:#x}"
            )));
        }

        let result = unsafe { resolve_shortcut_com(shortcut) };
        unsafe { CoUninitialize() };
        result
    }

    unsafe fn resolve_shortcut_com(shortcut: &Path) -> Result<PathBuf, OsError> {
        use windows_sys::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};

        let mut link_raw: *mut std::ffi::c_void = std::ptr::null_mut();
        let create_status = CoCreateInstance(
            &CLSID_SHELL_LINK,
            std::ptr::null_mut(),
            CLSCTX_INPROC_SERVER,
            &IID_ISHELL_LINK_W,
            &mut link_raw,
        );
        if create_status < 0 || link_raw.is_null() {
            return Err(OsError::new(format!(
                "CoCreateInstance(ShellLink) failed: {create_status:#x}"
            )));
        }
        let link = link_raw as *mut IShellLinkW;

        let mut persist_raw: *mut std::ffi::c_void = std::ptr::null_mut();
        let query_status =
            ((*(*link).vtbl).query_interface)(link_raw, &IID_IPERSIST_FILE, &mut persist_raw);
        if query_status < 0 || persist_raw.is_null() {
            ((*(*link).vtbl).release)(link_raw);
            return Err(OsError::new(format!(
                "QueryInterface(IPersistFile) failed: {query_status:#x}"
            )));
        }
        let persist = persist_raw as *mut IPersistFile;

        let path_wide = to_wide(shortcut.to_string_lossy().as_ref());
        // STGM_READ
        let load_status = ((*(*persist).vtbl).load)(persist_raw, path_wide.as_ptr(), 0);
        let result = if load_status < 0 {
            Err(OsError::new(format!(
                "shortcut load failed for {}: {load_status:#x}",
                shortcut.display()
            )))
        } else {
            let mut buffer = vec![0_u16; 1024];
            let get_status = ((*(*link).vtbl).get_path)(
                link_raw,
                buffer.as_mut_ptr(),
                buffer.len() as i32,
                std::ptr::null_mut(),
                0,
            );
            if get_status < 0 {
                Err(OsError::new(format!(
                    "shortcut target read failed: {get_status:#x}"
                )))
            } else {
                let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
                Ok(PathBuf::from(String::from_utf16_lossy(&buffer[..len])))
            }
        };

        ((*(*persist).vtbl).release)(persist_raw);
        ((*(*link).vtbl).release)(link_raw);
        result
    }

    pub(super) fn enumerate_windows() -> Vec<OsWindow> {
        unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> i32 {
            let windows = &mut *(lparam as *mut Vec<OsWindow>);
            if IsWindowVisible(hwnd) != 0 {
                let title = window_title(hwnd);
                if !title.is_empty() {
                    windows.push(OsWindow {
                        handle: WindowHandle(hwnd as isize),
                        title,
                    });
                }
            }
            1
        }

        let mut windows: Vec<OsWindow> = Vec::new();
        unsafe {
            EnumWindows(Some(enum_callback), &mut windows as *mut _ as LPARAM);
        }
        windows
    }

    fn window_title(hwnd: HWND) -> String {
        let length = unsafe { GetWindowTextLengthW(hwnd) };
        if length <= 0 {
            return String::new();
        }
        let mut buffer = vec![0_u16; length as usize + 1];
        let copied = unsafe { GetWindowTextW(hwnd, buffer.as_mut_ptr(), length + 1) };
        if copied <= 0 {
            return String::new();
        }
        String::from_utf16_lossy(&buffer[..copied as usize])
    }

    pub(super) fn focus_window(handle: WindowHandle) -> bool {
        let hwnd = handle.0 as HWND;
        unsafe {
            if IsIconic(hwnd) != 0 {
                ShowWindow(hwnd, SW_RESTORE);
            }
            // The OS may refuse foreground activation; best effort only.
            SetForegroundWindow(hwnd) != 0
        }
    }

    fn to_wide(value: &str) -> Vec<u16> {
        value.encode_utf16().chain(std::iter::once(0)).collect()
    }
}
