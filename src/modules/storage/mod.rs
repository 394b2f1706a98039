//! Storage module for uploaded media files
//!
//! Provides a local-disk store: uploads are written under a configured
//! directory with generated filenames and served back as byte streams.

mod disk;

pub use disk::DiskStorage;
