//! Materializes project manifests (`{"Files": [...]}`) into directory trees.
//!
//! The reading side is built bottom-up: [`scan`] matches delimiters, [`fields`]
//! pulls values out of one entry object, [`escape`] decodes string literals,
//! [`manifest`] turns entry arrays into [`vfs::Entry`] trees and
//! [`materialize`] writes them. [`source`] ties it together for a whole
//! manifest.
pub mod api;
pub mod config;
pub mod copy;
pub mod errors;
pub mod escape;
pub mod fields;
pub mod manifest;
pub mod materialize;
pub mod pack;
pub mod preview;
pub mod prompt;
pub mod report;
pub mod scan;
pub mod source;
pub mod vfs;
mod utils;
