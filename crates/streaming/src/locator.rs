use crate::source::is_remote;

/// Rewrites a locator before dispatch. Applied per candidate, so retry order
/// is unaffected.
pub trait LocatorRewrite: Send + Sync {
    fn rewrite(&self, locator: &str) -> String;
}

/// Leaves locators untouched.
#[derive(Debug, Default, Copy, Clone)]
pub struct Identity;

impl LocatorRewrite for Identity {
    fn rewrite(&self, locator: &str) -> String {
        locator.to_string()
    }
}

/// Routes remote locators through a proxy: `<prefix><percent-encoded url>`.
/// Local paths pass through unchanged.
#[derive(Debug, Clone)]
pub struct ProxyPrefix {
    prefix: String,
}

impl ProxyPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl LocatorRewrite for ProxyPrefix {
    fn rewrite(&self, locator: &str) -> String {
        if is_remote(locator) {
            format!("{}{}", self.prefix, urlencoding::encode(locator.trim()))
        } else {
            locator.to_string()
        }
    }
}
