//! Movement node lookups.
//!
//! Provides:
//! - `ViewClient` - Read-only view-function calls against a node
//! - `HttpViewClient` - `ViewClient` over the node REST API
//! - `DecimalsLookup` - Token decimals with a configured fallback

pub mod decimals;
pub mod view;

pub use decimals::DecimalsLookup;
pub use view::{HttpViewClient, LookupError, ViewClient, ViewRequest};
