//! Callback parameters carried in the URL of a callback tab.

use std::collections::BTreeMap;

use url::{Url, form_urlencoded};

/// `status` parameter: `success` or `error`.
pub const STATUS: &str = "status";
/// `log` parameter: human readable wallet message.
pub const LOG: &str = "log";
/// `address` parameter: connected wallet address.
pub const ADDRESS: &str = "address";
/// Encryption key returned together with the address.
pub const ENCRYPTION_KEY: &str = "column_encryption_public_key";
/// `network` parameter: network identifier of the wallet.
pub const NETWORK: &str = "network";
/// `transaction_hash` parameter: hash of a submitted transaction.
pub const TRANSACTION_HASH: &str = "transaction_hash";

/// Merged redirect parameters of one page load.
///
/// Query-string pairs come first; fragment pairs are overlaid on top and win
/// on key collision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParameters {
    params: BTreeMap<String, String>,
}

impl CallbackParameters {
    /// Merge a query string and a fragment.
    ///
    /// A leading `?` or `#` is ignored.
    #[must_use]
    pub fn parse(query: &str, fragment: &str) -> Self {
        let mut params = decode(query.strip_prefix('?').unwrap_or(query));
        params.extend(decode(fragment.strip_prefix('#').unwrap_or(fragment)));
        Self { params }
    }

    /// Merge the query string and fragment of a full URL.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self::parse(url.query().unwrap_or_default(), url.fragment().unwrap_or_default())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value of `key`, treating an empty value as absent.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// `status` and `log`, when both are non-empty.
    #[must_use]
    pub fn status_log(&self) -> Option<(&str, &str)> {
        Some((self.non_empty(STATUS)?, self.non_empty(LOG)?))
    }

    /// `address` and encryption key, when both are non-empty.
    #[must_use]
    pub fn connection(&self) -> Option<(&str, &str)> {
        Some((self.non_empty(ADDRESS)?, self.non_empty(ENCRYPTION_KEY)?))
    }

    #[must_use]
    pub fn network(&self) -> Option<&str> {
        self.non_empty(NETWORK)
    }

    #[must_use]
    pub fn transaction_hash(&self) -> Option<&str> {
        self.non_empty(TRANSACTION_HASH)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CallbackParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// Later duplicates overwrite earlier ones, like `Object.fromEntries`.
fn decode(input: &str) -> BTreeMap<String, String> {
    form_urlencoded::parse(input.as_bytes())
        .into_owned()
        .collect()
}
