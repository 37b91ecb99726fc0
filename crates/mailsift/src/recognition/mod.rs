//! Address recognition over extracted text.
//!
//! - [`normalize`] rewrites obfuscated markers (`[at]`, `(dot)`, ...)
//! - [`recognizer`] finds candidates and cuts their context windows
//! - [`hints`] reads names and companies from that context

pub mod hints;
pub mod normalize;
pub mod recognizer;

pub use hints::{company_from_domain, company_hint, name_hint};
pub use normalize::{Normalizer, normalize};
pub use recognizer::{Recognizer, find_address_shaped, normalize_address, passes_basic_filter};
