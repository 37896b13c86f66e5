//! Session reconciliation and storage for Column wallet tabs.
//!
//! Provides:
//! - `SessionReconciler` - Per-tab wallet session state machine
//! - `Tab` - Reconciler wired to a cross-tab channel and tab host
//! - `CleanupPolicy` - Callback tab URL cleanup and self-closing
//! - Store implementations (memory, file)

pub mod cleanup;
pub mod host;
pub mod reconciler;
pub mod storage;
pub mod tab;

pub use cleanup::CleanupPolicy;
pub use host::UrlTab;
pub use reconciler::SessionReconciler;
pub use tab::Tab;
