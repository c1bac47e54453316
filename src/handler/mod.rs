//! Request handler module
//!
//! Request routing dispatch plus the static file fallback for report pages.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
