//! Modules layer - Infrastructure components behind the feature slices
//!
//! Contains the document store backends and the local-disk file storage.

pub mod storage;
pub mod store;
