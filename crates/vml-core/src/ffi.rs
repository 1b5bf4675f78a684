// SPDX-License-Identifier: AGPL-3.0-or-later
//! C FFI exports
//!
//! Strings returned through `out_*` pointers are owned by the library and must
//! be released with [`vml_free_string`]; document handles with
//! [`vml_free_document`].

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::ast::Document;
use crate::parser::VmlParser;
use crate::traits::{renderer_for, OutputFormat, ParseConfig, Parser, RenderConfig, Renderer};

/// Opaque handle to a parsed document
pub struct DocumentHandle {
    doc: Document,
}

/// Result code for FFI operations
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResult {
    Success = 0,
    InvalidInput = 1,
    ParseError = 2,
    RenderError = 3,
    NullPointer = 4,
    Utf8Error = 5,
    SerializationError = 6,
}

/// Output format for FFI
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiFormat {
    Html = 0,
    Markdown = 1,
}

impl From<FfiFormat> for OutputFormat {
    fn from(f: FfiFormat) -> Self {
        match f {
            FfiFormat::Html => OutputFormat::Html,
            FfiFormat::Markdown => OutputFormat::Markdown,
        }
    }
}

/// Borrow a C string as UTF-8
unsafe fn input_str<'a>(content: *const c_char) -> Result<&'a str, FfiResult> {
    if content.is_null() {
        return Err(FfiResult::NullPointer);
    }
    CStr::from_ptr(content)
        .to_str()
        .map_err(|_| FfiResult::Utf8Error)
}

/// Hand `output` to the caller as an owned C string
unsafe fn write_output(
    output: String,
    out_content: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    let length = output.len();
    let c_string = match CString::new(output) {
        Ok(s) => s,
        Err(_) => return FfiResult::InvalidInput,
    };

    *out_length = length;
    *out_content = c_string.into_raw();
    FfiResult::Success
}

/// Parse VML source into a document handle
///
/// # Safety
/// - `content` must be a valid null-terminated UTF-8 string
/// - `out_handle` must be a valid pointer to store the result
#[no_mangle]
pub unsafe extern "C" fn vml_parse(
    content: *const c_char,
    out_handle: *mut *mut DocumentHandle,
) -> FfiResult {
    if out_handle.is_null() {
        return FfiResult::NullPointer;
    }
    let content_str = match input_str(content) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let doc = match VmlParser::new().parse(content_str, &ParseConfig::default()) {
        Ok(d) => d,
        Err(err) => {
            tracing::debug!(error = %err, "FFI parse failed");
            return FfiResult::ParseError;
        }
    };

    let handle = Box::new(DocumentHandle { doc });
    *out_handle = Box::into_raw(handle);

    FfiResult::Success
}

/// Render a document to a string in the specified format
///
/// # Safety
/// - `handle` must be a valid document handle from `vml_parse`
/// - `out_content` must be a valid pointer to store the result
/// - `out_length` must be a valid pointer to store the length
#[no_mangle]
pub unsafe extern "C" fn vml_render(
    handle: *const DocumentHandle,
    format: FfiFormat,
    out_content: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    if handle.is_null() || out_content.is_null() || out_length.is_null() {
        return FfiResult::NullPointer;
    }

    let doc = &(*handle).doc;
    let output = match renderer_for(format.into()).render(doc, &RenderConfig::default()) {
        Ok(s) => s,
        Err(_) => return FfiResult::RenderError,
    };

    write_output(output, out_content, out_length)
}

/// Get the `title` metadata value of a document, or an empty string
///
/// # Safety
/// - `handle` must be a valid document handle
/// - `out_title` must be a valid pointer
/// - `out_length` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn vml_get_title(
    handle: *const DocumentHandle,
    out_title: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    if handle.is_null() || out_title.is_null() || out_length.is_null() {
        return FfiResult::NullPointer;
    }

    let title = (*handle).doc.title().unwrap_or_default().to_string();
    write_output(title, out_title, out_length)
}

/// Get the number of elements in a document, section contents included
///
/// # Safety
/// - `handle` must be a valid document handle
#[no_mangle]
pub unsafe extern "C" fn vml_element_count(handle: *const DocumentHandle) -> usize {
    if handle.is_null() {
        return 0;
    }
    (*handle).doc.element_count()
}

/// Validate VML source; the report is written as JSON
///
/// # Safety
/// - `content` must be a valid null-terminated UTF-8 string
/// - `out_report` and `out_length` must be valid pointers
#[no_mangle]
pub unsafe extern "C" fn vml_validate(
    content: *const c_char,
    out_report: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    if out_report.is_null() || out_length.is_null() {
        return FfiResult::NullPointer;
    }
    let content_str = match input_str(content) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let report = crate::validate::validate(content_str);
    match serde_json::to_string(&report) {
        Ok(json) => write_output(json, out_report, out_length),
        Err(_) => FfiResult::SerializationError,
    }
}

/// Format VML source
///
/// # Safety
/// - `content` must be a valid null-terminated UTF-8 string
/// - `out_content` and `out_length` must be valid pointers
#[no_mangle]
pub unsafe extern "C" fn vml_format(
    content: *const c_char,
    out_content: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    if out_content.is_null() || out_length.is_null() {
        return FfiResult::NullPointer;
    }
    let content_str = match input_str(content) {
        Ok(s) => s,
        Err(code) => return code,
    };

    write_output(crate::formatter::format(content_str), out_content, out_length)
}

/// Parse VML source and render it in one call
///
/// # Safety
/// - All pointers must be valid
#[no_mangle]
pub unsafe extern "C" fn vml_convert(
    content: *const c_char,
    to_format: FfiFormat,
    out_content: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    if content.is_null() || out_content.is_null() || out_length.is_null() {
        return FfiResult::NullPointer;
    }

    let mut handle: *mut DocumentHandle = ptr::null_mut();
    let parse_result = vml_parse(content, &mut handle);
    if parse_result != FfiResult::Success {
        return parse_result;
    }

    let render_result = vml_render(handle, to_format, out_content, out_length);
    vml_free_document(handle);

    render_result
}

/// Free a document handle
///
/// # Safety
/// - `handle` must be a valid document handle or null
#[no_mangle]
pub unsafe extern "C" fn vml_free_document(handle: *mut DocumentHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Free a string allocated by the library
///
/// # Safety
/// - `s` must be a valid string from this library or null
#[no_mangle]
pub unsafe extern "C" fn vml_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get library version
///
/// Returns a static string, do not free
#[no_mangle]
pub extern "C" fn vml_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    unsafe fn take_string(s: *mut c_char) -> String {
        let owned = CStr::from_ptr(s).to_str().unwrap().to_string();
        vml_free_string(s);
        owned
    }

    #[test]
    fn test_parse_and_render() {
        let content = CString::new("---\ntitle: FFI\n---\n# Hello\n:: box\nWorld\n:: /box").unwrap();
        let mut handle: *mut DocumentHandle = ptr::null_mut();

        unsafe {
            let result = vml_parse(content.as_ptr(), &mut handle);
            assert_eq!(result, FfiResult::Success);
            assert!(!handle.is_null());

            assert_eq!(vml_element_count(handle), 3);

            let mut title: *mut c_char = ptr::null_mut();
            let mut length = 0;
            assert_eq!(vml_get_title(handle, &mut title, &mut length), FfiResult::Success);
            assert_eq!(length, 3);
            assert_eq!(take_string(title), "FFI");

            let mut out: *mut c_char = ptr::null_mut();
            assert_eq!(
                vml_render(handle, FfiFormat::Markdown, &mut out, &mut length),
                FfiResult::Success
            );
            assert_eq!(
                take_string(out),
                "---\ntitle: FFI\n---\n\n# Hello\n\n<!-- section: box -->\n\n"
            );

            vml_free_document(handle);
        }
    }

    #[test]
    fn test_convert() {
        let content = CString::new("# Hi").unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let mut length = 0;

        unsafe {
            let result = vml_convert(content.as_ptr(), FfiFormat::Html, &mut out, &mut length);
            assert_eq!(result, FfiResult::Success);
            let html = take_string(out);
            assert_eq!(html.len(), length);
            assert!(html.contains("<h1>Hi</h1>"));
        }
    }

    #[test]
    fn test_validate_json() {
        let content = CString::new(":: a\n:: /b").unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let mut length = 0;

        unsafe {
            assert_eq!(vml_validate(content.as_ptr(), &mut out, &mut length), FfiResult::Success);
            let json: serde_json::Value = serde_json::from_str(&take_string(out)).unwrap();
            assert_eq!(json["is_valid"], false);
            assert_eq!(json["diagnostics"][0]["kind"], "unmatched_close");
            assert_eq!(json["diagnostics"][0]["line"], 2);
        }
    }

    #[test]
    fn test_format() {
        let content = CString::new("# A\ntext").unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let mut length = 0;

        unsafe {
            assert_eq!(vml_format(content.as_ptr(), &mut out, &mut length), FfiResult::Success);
            assert_eq!(take_string(out), "# A\n\ntext");
        }
    }

    #[test]
    fn test_null_pointers() {
        let mut handle: *mut DocumentHandle = ptr::null_mut();
        unsafe {
            assert_eq!(vml_parse(ptr::null(), &mut handle), FfiResult::NullPointer);
            assert_eq!(vml_element_count(ptr::null()), 0);
            vml_free_document(ptr::null_mut());
            vml_free_string(ptr::null_mut());
        }
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(vml_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
