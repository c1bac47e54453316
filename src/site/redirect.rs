//! Root redirect rule

use hyper::StatusCode;

/// Unconditional redirect from one exact path to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectRule {
    pub source_path: &'static str,
    pub destination_path: &'static str,
    pub permanent: bool,
}

/// `/` always lands on the static main index
pub const ROOT_REDIRECT: RedirectRule = RedirectRule {
    source_path: "/",
    destination_path: "/index.html",
    permanent: true,
};

impl RedirectRule {
    /// Exact path match; query strings are not part of `path`
    pub fn applies_to(&self, path: &str) -> bool {
        path == self.source_path
    }

    /// 308 for permanent rules, 307 otherwise (both preserve the method)
    pub const fn status(&self) -> StatusCode {
        if self.permanent {
            StatusCode::PERMANENT_REDIRECT
        } else {
            StatusCode::TEMPORARY_REDIRECT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_only() {
        assert!(ROOT_REDIRECT.applies_to("/"));
        assert!(!ROOT_REDIRECT.applies_to("/index.html"));
        assert!(!ROOT_REDIRECT.applies_to("//"));
        assert!(!ROOT_REDIRECT.applies_to("/landing"));
        assert!(!ROOT_REDIRECT.applies_to(""));
    }

    #[test]
    fn test_status() {
        assert_eq!(ROOT_REDIRECT.status(), StatusCode::PERMANENT_REDIRECT);
        let temporary = RedirectRule {
            permanent: false,
            ..ROOT_REDIRECT
        };
        assert_eq!(temporary.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}
