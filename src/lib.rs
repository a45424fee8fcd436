//! Library crate for celeb-directory.
//!
//! This crate exposes the building blocks of the TUI:
//! - Date-of-birth arithmetic (`age`)
//! - Application state, operations and update loop (`app`)
//! - Profile records and dataset loading (`data`)
//! - Error and result types (`error`)
//! - Name search (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `celeb-directory` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod age;
pub mod app;
pub mod data;
pub mod error;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result, ValidationError};
