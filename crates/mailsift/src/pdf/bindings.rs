use super::error::{PdfError, classify_load_error};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use pdfium_render::prelude::*;
use std::path::PathBuf;

/// Directory searched for the Pdfium shared library before the system paths.
pub const PDFIUM_LIB_DIR_ENV: &str = "PDFIUM_LIB_DIR";

/// Outcome of the first binding attempt, reused by every later call.
enum InitializationState {
    Uninitialized,
    Initialized { lib_dir: Option<PathBuf> },
    Failed(String),
}

static PDFIUM_STATE: Lazy<Mutex<InitializationState>> = Lazy::new(|| Mutex::new(InitializationState::Uninitialized));

fn bind_at(lib_dir: Option<&PathBuf>) -> Result<Box<dyn PdfiumLibraryBindings>, String> {
    match lib_dir {
        Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            .map_err(|e| format!("Failed to load Pdfium from {}: {}", dir.display(), e)),
        None => Pdfium::bind_to_system_library().map_err(|e| format!("Failed to load system Pdfium: {}", e)),
    }
}

fn first_binding() -> Result<(Option<PathBuf>, Box<dyn PdfiumLibraryBindings>), String> {
    if let Some(dir) = std::env::var_os(PDFIUM_LIB_DIR_ENV).map(PathBuf::from) {
        match bind_at(Some(&dir)) {
            Ok(bindings) => return Ok((Some(dir), bindings)),
            Err(err) => tracing::debug!(error = %err, "Falling back to system Pdfium"),
        }
    }
    bind_at(None).map(|bindings| (None, bindings))
}

/// Create fresh Pdfium bindings.
///
/// The library is located once per process; a failure is remembered so later
/// documents fail fast instead of probing the filesystem again.
pub(crate) fn bind_pdfium(
    map_err: fn(String) -> PdfError,
    context: &'static str,
) -> Result<Box<dyn PdfiumLibraryBindings>, PdfError> {
    let mut state = PDFIUM_STATE.lock();

    match &*state {
        InitializationState::Uninitialized => match first_binding() {
            Ok((lib_dir, bindings)) => {
                *state = InitializationState::Initialized { lib_dir };
                Ok(bindings)
            }
            Err(err) => {
                *state = InitializationState::Failed(err.clone());
                Err(map_err(format!("Pdfium initialization failed ({}): {}", context, err)))
            }
        },
        InitializationState::Failed(err) => Err(map_err(format!(
            "Pdfium initialization previously failed ({}): {}",
            context, err
        ))),
        InitializationState::Initialized { lib_dir } => {
            bind_at(lib_dir.as_ref()).map_err(|e| map_err(format!("Failed to create Pdfium bindings ({}): {}", context, e)))
        }
    }
}

/// Open a document, mapping password failures to [`PdfError::PasswordRequired`].
pub(crate) fn open_document<'a>(pdfium: &'a Pdfium, bytes: &'a [u8]) -> Result<PdfDocument<'a>, PdfError> {
    pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| classify_load_error(e.to_string()))
}
