//! Site content module
//!
//! Holds the build-time navigation manifest, the root redirect rule and the
//! landing page renderer. Nothing in here changes after process start.

pub mod manifest;
pub mod redirect;
pub mod render;

pub use manifest::WEEKLY_REPORTS;
pub use redirect::ROOT_REDIRECT;
pub use render::{LandingPage, RenderedPage};
