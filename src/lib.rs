//! A height-balanced ordered index for Rust.
//!
//! This crate provides [`AvlIndex`], an AVL tree of labelled [`Entry`] values
//! ordered by an integer key, and [`IndexedStore`], a record-store façade over
//! it with range queries, nearest-key lookup and bulk clearing.
//!
//! Every search reports how many node slots it probed, which makes the
//! O(log n) cost of a balanced tree directly observable.
//!
//! # Example
//!
//! ```
//! use avl_store::{Entry, IndexedStore};
//!
//! let mut store = IndexedStore::new();
//! let _ = store.insert(Entry::new("1984", 40));
//! let _ = store.insert(Entry::new("Pride and Prejudice", 20));
//! let _ = store.insert(Entry::new("War and Peace", 70));
//! let _ = store.insert(Entry::new("The Great Gatsby", 10));
//! let _ = store.insert(Entry::new("To Kill a Mockingbird", 50));
//!
//! assert_eq!(store.count_records(), 5);
//! assert_eq!(store.tree_height(), 3);
//!
//! // The first insert is still the root, so it costs one comparison.
//! assert_eq!(store.search_comparisons("1984", 40), 1);
//!
//! // Misses are `None`, not an error.
//! assert_eq!(store.search("Don Quixote", 100).entry, None);
//!
//! let titles: Vec<&str> = store.range_query(40, 70).into_iter().map(Entry::label).collect();
//! assert_eq!(titles, ["1984", "To Kill a Mockingbird", "War and Peace"]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Arena storage** - Nodes live in one slot vector and refer to children by handle
//! - **Search telemetry** - [`SearchOutcome`] carries the probe count of each lookup
//! - **Self-checking** - [`AvlIndex::check_invariants`] verifies ordering, balance, heights and count
//!
//! # Implementation
//!
//! Inserts and removals recurse from the root and rebalance on the way back
//! up with single or double rotations, so the height never exceeds about
//! 1.44 log<sub>2</sub>(n + 2).

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod avl_index;
mod config;
mod entry;
mod error;
mod indexed_store;
mod raw;

pub use avl_index::{AvlIndex, InsertOutcome, Iter, SearchOutcome};
pub use config::{IndexConfig, OnDuplicate};
pub use entry::Entry;
pub use error::{IndexError, Result};
pub use indexed_store::IndexedStore;
