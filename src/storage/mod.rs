//! Storage module
//!
//! On-disk content-addressed storage for uploaded media.

pub mod blob_store;

pub use blob_store::BlobStore;
