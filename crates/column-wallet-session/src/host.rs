//! URL-backed tab host.

use std::sync::{Mutex, PoisonError};

use column_wallet_core::{TabHost, traits::TabLocation};
use url::Url;

/// Tab whose location is a plain URL.
///
/// Records URL replacements and close requests instead of touching a real
/// browser window.
pub struct UrlTab {
    url: Mutex<Url>,
    opener: bool,
    history_length: usize,
    closed: Mutex<bool>,
}

impl UrlTab {
    /// Tab at `url` with a single history entry and no opener.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url: Mutex::new(url),
            opener: false,
            history_length: 1,
            closed: Mutex::new(false),
        }
    }

    /// Mark the tab as opened by another window.
    #[must_use]
    pub fn with_opener(mut self, opener: bool) -> Self {
        self.opener = opener;
        self
    }

    #[must_use]
    pub fn with_history_length(mut self, history_length: usize) -> Self {
        self.history_length = history_length;
        self
    }

    /// Current URL.
    #[must_use]
    pub fn url(&self) -> Url {
        self.url.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether [`TabHost::close`] was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TabHost for UrlTab {
    fn location(&self) -> TabLocation {
        TabLocation::from_url(&self.url())
    }

    fn replace_url(&self, path: &str) {
        let mut url = self.url.lock().unwrap_or_else(PoisonError::into_inner);
        url.set_path(path);
        url.set_query(None);
        url.set_fragment(None);
    }

    fn has_opener(&self) -> bool {
        self.opener
    }

    fn history_length(&self) -> usize {
        self.history_length
    }

    fn close(&self) {
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_url_strips_parameters() {
        let tab = UrlTab::new(Url::parse("https://app.example/wallet?status=ok#address=0x1").unwrap());
        tab.replace_url(&tab.location().path);
        assert_eq!(tab.url().as_str(), "https://app.example/wallet");
    }
}
