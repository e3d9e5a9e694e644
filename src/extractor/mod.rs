//! Main content extraction module.
//!
//! # Module Structure
//!
//! - `cleaner`: boilerplate removal on a detached clone of a candidate
//! - `validator`: quality thresholds a cleaned candidate must meet
//! - `fallback`: document-wide assembly when every candidate failed
//! - `pipeline`: orchestration, retries and deadline checks
//!
//! # Usage
//!
//! ```rust
//! use rs_markclip::{dom, extractor, ExtractionContext, Options};
//!
//! let html = "<article><h1>Title</h1><p>Enough text in this paragraph to pass validation.</p></article>";
//! let doc = dom::parse(html);
//! let result = extractor::extract_document(&doc, &ExtractionContext::new(&Options::default()))?;
//! assert!(result.markdown.starts_with("# Title"));
//! # Ok::<(), rs_markclip::Error>(())
//! ```

pub mod cleaner;
pub mod fallback;
pub mod pipeline;
pub mod validator;

pub use cleaner::{clean, Cleaned, CleaningRules};
pub use fallback::{aggressive_fallback, FallbackSource};
pub use pipeline::extract_document;
pub use validator::{validate, Rejection, Verdict};
