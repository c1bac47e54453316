//! Landing page renderer
//!
//! Fills `templates/landing.html` from the manifest. The page is rendered
//! once at startup and served from memory; every request sees identical bytes.

use askama::Template;
use hyper::body::Bytes;

use super::manifest::{NavigationEntry, MAIN_PAGE, WEEKLY_REPORTS};
use crate::config::SiteConfig;
use crate::http::cache;

/// Content of the landing page
///
/// Text fields are HTML-escaped by the template.
#[derive(Debug, Clone, Template)]
#[template(path = "landing.html")]
pub struct LandingPage {
    pub title: String,
    pub description: String,
    pub main_page: NavigationEntry,
    pub weekly_reports: &'static [NavigationEntry],
}

/// Pre-rendered landing page ready to be served
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: Bytes,
    pub etag: String,
}

impl LandingPage {
    /// Landing page with configured heading and text over the built-in manifest
    pub fn from_config(site: &SiteConfig) -> Self {
        Self {
            title: site.title.clone(),
            description: site.description.clone(),
            main_page: MAIN_PAGE,
            weekly_reports: WEEKLY_REPORTS,
        }
    }

    /// Render and compute the `ETag` once
    pub fn prerender(&self) -> Result<RenderedPage, askama::Error> {
        let html = self.render()?;
        let etag = cache::generate_etag(html.as_bytes());
        Ok(RenderedPage {
            html: Bytes::from(html),
            etag,
        })
    }
}
