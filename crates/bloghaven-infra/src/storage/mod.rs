//! Uploaded file storage.

mod local;

pub use local::LocalImageStore;
