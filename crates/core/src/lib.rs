//! Domain types shared by the registry client and the inventory exporter.
//!
//! Nothing in this crate performs I/O: it holds the exported record shape,
//! the feed list and the validation rules applied to it.

pub mod error;
pub mod feed;
pub mod record;
