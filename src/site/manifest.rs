//! Navigation manifest
//!
//! The fixed list of links shown on the landing page. Slice order is display order.

/// A single hyperlink on the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationEntry {
    pub label: &'static str,
    pub path: &'static str,
}

impl NavigationEntry {
    pub const fn new(label: &'static str, path: &'static str) -> Self {
        Self { label, path }
    }
}

/// Link shown under "Main Page"
pub const MAIN_PAGE: NavigationEntry = NavigationEntry::new("Go to Main Index", "/index.html");

/// Links shown under "Weekly Reports"
pub const WEEKLY_REPORTS: &[NavigationEntry] = &[
    NavigationEntry::new("EIPs", "/weekly_report/EIPs"),
    NavigationEntry::new("RIPs", "/weekly_report/RIPs"),
    NavigationEntry::new("L2-interop", "/weekly_report/L2-interop"),
    NavigationEntry::new("reth", "/weekly_report/reth"),
    NavigationEntry::new("eliza", "/weekly_report/eliza"),
    NavigationEntry::new("optimism", "/weekly_report/optimism"),
    NavigationEntry::new("rbuilder", "/weekly_report/rbuilder"),
    NavigationEntry::new("rollup-boost", "/weekly_report/rollup-boost"),
    NavigationEntry::new("nitro", "/weekly_report/nitro"),
];
