//! Cached, deduplicated backend reads.
//!
//! - [`QueryKey`] identifies a read deterministically from its inputs
//! - [`QueryCache`] shares results and in-flight requests between readers
//! - [`ResourceQuery`] is the per-view state machine that guards against
//!   stale responses and stops applying results after unmount

pub mod cache;
pub mod key;
pub mod resource;

pub use cache::QueryCache;
pub use key::{KeyScope, ListInputs, QueryKey};
pub use resource::{FetchTicket, QueryState, ResourceQuery, load, load_page, reload_page};
