//! Persistent string-keyed mapping with interchangeable on-disk formats.
//!
//! Open a mapping with a `<name>.<format>` token (YAML, JSON, MessagePack,
//! XML, or CSV), write to it like a map, and every write lands on disk
//! immediately. A change ledger tracks which keys were touched since the
//! last full read.
//!
//! ```rust,no_run
//! use mirrormap::MirrorMap;
//!
//! let mut cfg = MirrorMap::open("settings.yaml").unwrap();
//! cfg.set("retries", 3);
//! cfg.set("endpoint", "https://api.example.net");
//!
//! let (changed, keys) = cfg.item_changed();
//! assert!(changed && keys == ["retries", "endpoint"]);
//! ```
//!
//! Formats are not equally expressive: YAML, JSON, and MessagePack round-trip
//! nested values intact, while XML and CSV flatten them (see [`codec`] for
//! the exact rules). Pick a structured format unless you need the file to be
//! a spreadsheet or feed an XML consumer.
//!
//! **Single-process only.** Two processes opening the same backing file will
//! clobber each other's writes. Use advisory file locking or a real database
//! if you need that.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod format;
pub mod identity;
pub mod ledger;
pub mod persist;
pub mod store;

pub use error::{Error, Result};
pub use format::Format;
pub use identity::StorageIdentity;
pub use ledger::ChangeLedger;
pub use store::MirrorMap;

/// Dynamically typed value stored in a mapping.
pub use serde_json::Value;

/// In-memory shape of a mapping: string keys to dynamic values, in insertion
/// order.
pub type Mapping = indexmap::IndexMap<String, Value>;
