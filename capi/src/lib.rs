//! C ABI for the libswipe recognition core.
//!
//! Hosts exchange data through parallel arrays: key geometry and code
//! points for layouts, x/y/t triples for raw paths, and word/confidence/
//! flag arrays for results with a written-count return. Every input is
//! copied into owned Rust values before use; the core never holds host
//! buffers beyond a single call.
//!
//! Engine lifetime is handle-based: `libswipe_engine_init*` returns an
//! opaque pointer that every other call takes as its first argument and
//! `libswipe_engine_shutdown` frees. All entry points are wrapped in
//! `catch_unwind` so a panic can never cross the FFI boundary.
//!
//! Callers must pass pointers that are either null or valid for the
//! documented element counts, and must not use an engine handle after
//! shutting it down.

use libc::{c_char, c_float, c_int, c_longlong};
use libswipe_core::{
    Engine, KeyDescriptor, KeyboardLayout, RawPath, RawPoint, DEFAULT_MAX_CANDIDATES,
};
use std::ffi::{CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::slice;

/// Build a layout from parallel host arrays. Returns `None` when any
/// required pointer is null.
unsafe fn build_layout(
    key_xs: *const c_float,
    key_ys: *const c_float,
    key_widths: *const c_float,
    key_heights: *const c_float,
    key_code_points: *const c_int,
    key_count: c_int,
    layout_width: c_float,
    layout_height: c_float,
    language_tag: *const c_char,
) -> Option<KeyboardLayout> {
    if key_count < 0 {
        return None;
    }
    let count = key_count as usize;
    if count > 0
        && (key_xs.is_null()
            || key_ys.is_null()
            || key_widths.is_null()
            || key_heights.is_null()
            || key_code_points.is_null())
    {
        return None;
    }

    let language_tag = if language_tag.is_null() {
        String::new()
    } else {
        CStr::from_ptr(language_tag)
            .to_str()
            .unwrap_or("")
            .to_string()
    };

    let mut layout = KeyboardLayout {
        language_tag,
        keys: Vec::with_capacity(count),
        layout_width,
        layout_height,
    };

    if count > 0 {
        let xs = slice::from_raw_parts(key_xs, count);
        let ys = slice::from_raw_parts(key_ys, count);
        let widths = slice::from_raw_parts(key_widths, count);
        let heights = slice::from_raw_parts(key_heights, count);
        let code_points = slice::from_raw_parts(key_code_points, count);

        for i in 0..count {
            let cp = code_points[i];
            let label = match u32::try_from(cp).ok().and_then(char::from_u32) {
                Some(ch) if cp > 0 && cp < 128 => ch.to_string(),
                _ => String::new(),
            };
            layout.keys.push(KeyDescriptor::new(
                label, cp, xs[i], ys[i], widths[i], heights[i],
            ));
        }
    }

    Some(layout)
}

fn into_handle(engine: Engine) -> *mut Engine {
    Box::into_raw(Box::new(engine))
}

/// Initialize an engine with a layout and a dictionary file path.
///
/// Array pointers must reference `key_count` elements; `language_tag` may
/// be null, `dict_path` must be a NUL-terminated path. Returns an opaque
/// handle, or null on failure.
#[no_mangle]
pub extern "C" fn libswipe_engine_init(
    key_xs: *const c_float,
    key_ys: *const c_float,
    key_widths: *const c_float,
    key_heights: *const c_float,
    key_code_points: *const c_int,
    key_count: c_int,
    layout_width: c_float,
    layout_height: c_float,
    language_tag: *const c_char,
    dict_path: *const c_char,
) -> *mut Engine {
    let result = catch_unwind(|| {
        let layout = unsafe {
            build_layout(
                key_xs,
                key_ys,
                key_widths,
                key_heights,
                key_code_points,
                key_count,
                layout_width,
                layout_height,
                language_tag,
            )
        }?;
        if dict_path.is_null() {
            return None;
        }
        let path = unsafe { CStr::from_ptr(dict_path) }.to_str().ok()?.to_string();

        let mut engine = Engine::new();
        if !engine.init(layout, &path) {
            return None;
        }
        Some(into_handle(engine))
    });
    result.ok().flatten().unwrap_or(ptr::null_mut())
}

/// Initialize an engine with a layout and an in-memory dictionary buffer of
/// `dict_len` bytes.
#[no_mangle]
pub extern "C" fn libswipe_engine_init_with_data(
    key_xs: *const c_float,
    key_ys: *const c_float,
    key_widths: *const c_float,
    key_heights: *const c_float,
    key_code_points: *const c_int,
    key_count: c_int,
    layout_width: c_float,
    layout_height: c_float,
    language_tag: *const c_char,
    dict_data: *const u8,
    dict_len: usize,
) -> *mut Engine {
    let result = catch_unwind(|| {
        let layout = unsafe {
            build_layout(
                key_xs,
                key_ys,
                key_widths,
                key_heights,
                key_code_points,
                key_count,
                layout_width,
                layout_height,
                language_tag,
            )
        }?;
        if dict_data.is_null() {
            return None;
        }
        let data = unsafe { slice::from_raw_parts(dict_data, dict_len) };

        let mut engine = Engine::new();
        if !engine.init_with_data(layout, data) {
            return None;
        }
        Some(into_handle(engine))
    });
    result.ok().flatten().unwrap_or(ptr::null_mut())
}

/// Recognize a gesture and write up to `max_candidates` results into the
/// output arrays. Returns the number of candidates written, or -1 on error.
///
/// Input arrays must hold `point_count` elements. Output arrays must have
/// room for `max_candidates` elements; a non-positive `max_candidates`
/// requests the default candidate count. `out_words` receives owned C
/// strings that the caller releases with [`libswipe_string_free`].
#[no_mangle]
pub extern "C" fn libswipe_engine_recognize(
    engine: *mut Engine,
    xs: *const c_float,
    ys: *const c_float,
    ts: *const c_longlong,
    point_count: c_int,
    max_candidates: c_int,
    out_words: *mut *mut c_char,
    out_confidences: *mut c_float,
    out_flags: *mut c_int,
) -> c_int {
    if engine.is_null() || point_count < 0 {
        return -1;
    }
    let result = catch_unwind(AssertUnwindSafe(|| {
        let engine = unsafe { &mut *engine };
        let count = point_count as usize;
        if count > 0 && (xs.is_null() || ys.is_null() || ts.is_null()) {
            return -1;
        }
        if out_words.is_null() || out_confidences.is_null() || out_flags.is_null() {
            return -1;
        }

        let mut raw = RawPath::default();
        if count > 0 {
            let xs = unsafe { slice::from_raw_parts(xs, count) };
            let ys = unsafe { slice::from_raw_parts(ys, count) };
            let ts = unsafe { slice::from_raw_parts(ts, count) };
            raw.points = (0..count)
                .map(|i| RawPoint::new(xs[i], ys[i], ts[i]))
                .collect();
        }

        let limit = if max_candidates > 0 {
            max_candidates as usize
        } else {
            DEFAULT_MAX_CANDIDATES
        };
        let candidates = engine.recognize(&raw, limit);
        let written = candidates.len().min(limit);

        let out_words = unsafe { slice::from_raw_parts_mut(out_words, limit) };
        let out_confidences = unsafe { slice::from_raw_parts_mut(out_confidences, limit) };
        let out_flags = unsafe { slice::from_raw_parts_mut(out_flags, limit) };

        for (i, candidate) in candidates.iter().take(written).enumerate() {
            out_words[i] = CString::new(candidate.word.as_str())
                .unwrap_or_default()
                .into_raw();
            out_confidences[i] = candidate.confidence;
            out_flags[i] = candidate.source_flags as c_int;
        }

        written as c_int
    }));
    result.unwrap_or(-1)
}

/// Replace the keyboard layout without reloading the dictionary.
#[no_mangle]
pub extern "C" fn libswipe_engine_update_layout(
    engine: *mut Engine,
    key_xs: *const c_float,
    key_ys: *const c_float,
    key_widths: *const c_float,
    key_heights: *const c_float,
    key_code_points: *const c_int,
    key_count: c_int,
    layout_width: c_float,
    layout_height: c_float,
) -> bool {
    if engine.is_null() {
        return false;
    }
    let result = catch_unwind(AssertUnwindSafe(|| {
        let layout = unsafe {
            build_layout(
                key_xs,
                key_ys,
                key_widths,
                key_heights,
                key_code_points,
                key_count,
                layout_width,
                layout_height,
                ptr::null(),
            )
        };
        match layout {
            Some(layout) => unsafe { &mut *engine }.update_layout(layout),
            None => false,
        }
    }));
    result.unwrap_or(false)
}

/// Whether the engine has a loaded dictionary.
#[no_mangle]
pub extern "C" fn libswipe_engine_is_initialized(engine: *const Engine) -> bool {
    if engine.is_null() {
        return false;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { &*engine }.is_initialized())).unwrap_or(false)
}

/// Numeric code of the last error on this engine, or 0 when none.
#[no_mangle]
pub extern "C" fn libswipe_engine_last_error(engine: *const Engine) -> c_int {
    if engine.is_null() {
        return 0;
    }
    catch_unwind(AssertUnwindSafe(|| {
        unsafe { &*engine }.last_error().map_or(0, |e| e.kind().code())
    }))
    .unwrap_or(0)
}

/// Shut the engine down and free its handle. Passing null is a no-op; the
/// handle must not be used afterwards.
#[no_mangle]
pub extern "C" fn libswipe_engine_shutdown(engine: *mut Engine) {
    if engine.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let mut engine = unsafe { Box::from_raw(engine) };
        engine.shutdown();
    }));
}

/// Release a string previously written into `out_words`. Each string must
/// be freed at most once.
#[no_mangle]
pub extern "C" fn libswipe_string_free(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}
