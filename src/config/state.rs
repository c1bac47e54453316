// Application state module
// Holds the loaded configuration and the pre-rendered landing page

use super::types::Config;
use crate::site::{LandingPage, RenderedPage};

/// Application state, shared read-only by every connection
pub struct AppState {
    pub config: Config,
    pub landing_page: RenderedPage,
    pub access_log: bool,
}

impl AppState {
    /// Build state and render the landing page once
    pub fn new(config: &Config) -> Result<Self, askama::Error> {
        let landing_page = LandingPage::from_config(&config.site).prerender()?;

        Ok(Self {
            config: config.clone(),
            landing_page,
            access_log: config.logging.access_log,
        })
    }
}
