#![cfg_attr(docsrs, feature(doc_cfg))]

//! Coordination-free, roughly time-ordered 63-bit identifiers.
//!
//! Every [`SnowflakeId`] packs four fields into a single positive `i64`-safe
//! integer:
//!
//! ```text
//!  Bit Index:  63           63 62            22 21              17 16             12 11             0
//!              +--------------+----------------+------------------+-----------------+---------------+
//!  Field:      | reserved (1) | timestamp (41) | datacenter ID (5)| machine ID (5)  | sequence (12) |
//!              +--------------+----------------+------------------+-----------------+---------------+
//! ```
//!
//! IDs are produced by an [`IdWorker`], which owns one lock-protected sequence
//! state per instance. Uniqueness across a fleet relies on every worker being
//! handed a distinct [`NodeId`].
//!
//! # Example
//!
//! ```
//! use idworker::{CUSTOM_EPOCH, IdWorker, NodeId, SystemClock};
//!
//! let worker = IdWorker::new(CUSTOM_EPOCH, NodeId::new(10, 1)?, SystemClock)?;
//!
//! let a = worker.next_id()?;
//! let b = worker.next_id()?;
//! assert!(a < b);
//! assert_eq!(a.datacenter_id(), 10);
//! assert_eq!(a.machine_id(), 1);
//! # Ok::<(), idworker::Error>(())
//! ```

mod error;
mod generator;
mod id;
mod node;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::node::*;
pub use crate::time::*;
