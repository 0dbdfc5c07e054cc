//! # convoy-id
//!
//! Typed identifiers for scheduler resources.
//!
//! Nodes, allocations and evaluations are identified by a prefixed ULID,
//! `{prefix}_{ulid}`:
//!
//! - `node_01HV4Z2WQXKJNM8GPQY6VBKC3D`
//! - `alloc_01HV4Z3MXNKPQR9HSTZ7WCLD4E`
//! - `eval_01HV4Z4NYPLTRS0JTUA8XDME5F`
//!
//! The prefix keeps the types from being mixed up on the wire, and the ULID
//! gives every ID a stable total order.
//!
//! Versions of replicated objects (a job's `modify_index`, for example) are
//! plain monotonic [`Index`] values rather than ULIDs.

mod error;
mod macros;
mod types;

pub use error::IdError;
#[doc(hidden)]
pub use macros::parse_prefixed;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
