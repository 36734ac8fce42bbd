//! C-ABI FFI bindings for cross-language integration.
//!
//! This module provides a C-compatible API so that host applications written
//! in other languages can export process documents.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::export::{ExportFormat, ExportOptions, Exporter};
use crate::model::{Screenshot, SourceDocument};
use crate::render::to_preview_html;
use crate::Artifact;

/// No error.
pub const PROCDOC_OK: i32 = 0;
/// The document title is empty.
pub const PROCDOC_ERR_MISSING_TITLE: i32 = 1;
/// Another export is running.
pub const PROCDOC_ERR_IN_PROGRESS: i32 = 2;
/// Layout, screenshot decoding or page rasterization failed.
pub const PROCDOC_ERR_RENDER: i32 = 3;
/// A pointer, string, data URL or options document was rejected.
pub const PROCDOC_ERR_INVALID_ARGUMENT: i32 = 4;
/// Any other failure.
pub const PROCDOC_ERR_OTHER: i32 = 5;

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct ProcdocResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// One of the `PROCDOC_*` codes.
    pub error_kind: i32,
    /// Output bytes (null if failed). Freed by `procdoc_free_result`.
    pub data: *mut u8,
    /// Length of `data` in bytes.
    pub len: usize,
    /// Suggested file name (null if failed or not applicable).
    pub file_name: *mut c_char,
    /// Error message (null if succeeded).
    pub error: *mut c_char,
}

impl ProcdocResult {
    fn success(bytes: Vec<u8>, file_name: Option<String>) -> Self {
        let boxed = bytes.into_boxed_slice();
        let len = boxed.len();
        Self {
            success: true,
            error_kind: PROCDOC_OK,
            data: Box::into_raw(boxed) as *mut u8,
            len,
            file_name: file_name
                .map(|name| CString::new(name).unwrap_or_default().into_raw())
                .unwrap_or(ptr::null_mut()),
            error: ptr::null_mut(),
        }
    }

    fn from_artifact(artifact: Artifact) -> Self {
        Self::success(artifact.bytes, Some(artifact.file_name))
    }

    fn error(kind: i32, message: String) -> Self {
        Self {
            success: false,
            error_kind: kind,
            data: ptr::null_mut(),
            len: 0,
            file_name: ptr::null_mut(),
            error: CString::new(message).unwrap_or_default().into_raw(),
        }
    }

    fn from_error(err: crate::Error) -> Self {
        let kind = match &err {
            crate::Error::MissingTitle => PROCDOC_ERR_MISSING_TITLE,
            crate::Error::ExportInProgress => PROCDOC_ERR_IN_PROGRESS,
            e if e.is_render_failure() => PROCDOC_ERR_RENDER,
            crate::Error::InvalidDataUrl(_) | crate::Error::Config(_) => {
                PROCDOC_ERR_INVALID_ARGUMENT
            }
            _ => PROCDOC_ERR_OTHER,
        };
        Self::error(kind, err.to_string())
    }
}

unsafe fn read_str<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, ProcdocResult> {
    if ptr.is_null() {
        return Err(ProcdocResult::error(
            PROCDOC_ERR_INVALID_ARGUMENT,
            format!("{} cannot be null", name),
        ));
    }
    CStr::from_ptr(ptr).to_str().map_err(|_| {
        ProcdocResult::error(
            PROCDOC_ERR_INVALID_ARGUMENT,
            format!("Invalid UTF-8 {}", name),
        )
    })
}

/// Export a title and body as flat text.
///
/// # Safety
///
/// `title` and `body` must be valid null-terminated UTF-8 strings.
/// The returned result must be freed with `procdoc_free_result`.
#[no_mangle]
pub unsafe extern "C" fn procdoc_export_text(
    title: *const c_char,
    body: *const c_char,
) -> ProcdocResult {
    let title = match read_str(title, "title") {
        Ok(s) => s,
        Err(e) => return e,
    };
    let body = match read_str(body, "body") {
        Ok(s) => s,
        Err(e) => return e,
    };

    match crate::export_text(title, body) {
        Ok(artifact) => ProcdocResult::from_artifact(artifact),
        Err(e) => ProcdocResult::from_error(e),
    }
}

/// Export a document as PDF.
///
/// `screenshots` points to `screenshot_count` base64 `data:` URLs and may be
/// null when the count is zero. `options_json` may be null for defaults.
///
/// # Safety
///
/// All non-null pointers must be valid null-terminated UTF-8 strings, and
/// `screenshots` must point to `screenshot_count` such pointers.
/// The returned result must be freed with `procdoc_free_result`.
#[no_mangle]
pub unsafe extern "C" fn procdoc_export_pdf(
    title: *const c_char,
    body: *const c_char,
    screenshots: *const *const c_char,
    screenshot_count: usize,
    options_json: *const c_char,
) -> ProcdocResult {
    let title = match read_str(title, "title") {
        Ok(s) => s,
        Err(e) => return e,
    };
    let body = match read_str(body, "body") {
        Ok(s) => s,
        Err(e) => return e,
    };

    let options = if options_json.is_null() {
        ExportOptions::default()
    } else {
        let json = match read_str(options_json, "options") {
            Ok(s) => s,
            Err(e) => return e,
        };
        match ExportOptions::from_json(json) {
            Ok(options) => options,
            Err(e) => return ProcdocResult::from_error(e),
        }
    };

    let mut doc = SourceDocument::new(title, body);
    if screenshot_count > 0 {
        if screenshots.is_null() {
            return ProcdocResult::error(
                PROCDOC_ERR_INVALID_ARGUMENT,
                "screenshots cannot be null".to_string(),
            );
        }
        for &url in std::slice::from_raw_parts(screenshots, screenshot_count) {
            let url = match read_str(url, "screenshot") {
                Ok(s) => s,
                Err(e) => return e,
            };
            match Screenshot::from_data_url(url) {
                Ok(shot) => doc.screenshots.push(shot),
                Err(e) => return ProcdocResult::from_error(e),
            }
        }
    }

    match Exporter::with_options(options).export(&doc, ExportFormat::Pdf) {
        Ok(artifact) => ProcdocResult::from_artifact(artifact),
        Err(e) => ProcdocResult::from_error(e),
    }
}

/// Render the HTML preview of a title and body.
///
/// # Safety
///
/// `title` and `body` must be valid null-terminated UTF-8 strings.
/// The returned result must be freed with `procdoc_free_result`.
#[no_mangle]
pub unsafe extern "C" fn procdoc_preview_html(
    title: *const c_char,
    body: *const c_char,
) -> ProcdocResult {
    let title = match read_str(title, "title") {
        Ok(s) => s,
        Err(e) => return e,
    };
    let body = match read_str(body, "body") {
        Ok(s) => s,
        Err(e) => return e,
    };

    let html = to_preview_html(&SourceDocument::new(title, body));
    ProcdocResult::success(html.into_bytes(), None)
}

/// Free a result returned by any procdoc function.
///
/// # Safety
///
/// The `result` must have been returned by a procdoc function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn procdoc_free_result(result: ProcdocResult) {
    if !result.data.is_null() {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
            result.data,
            result.len,
        )));
    }
    if !result.file_name.is_null() {
        drop(CString::from_raw(result.file_name));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Get the version of the procdoc library.
///
/// The returned string is statically allocated and should not be freed.
#[no_mangle]
pub extern "C" fn procdoc_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
