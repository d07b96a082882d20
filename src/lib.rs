//! Storage backend for an elliptics cluster, exposed through file-like
//! handles over its HTTP API.
//!
//! [`EllipticsStorage`] talks to two endpoints: a public one that serves
//! stored objects to clients and a private one that accepts modification
//! requests. [`EllipticsStorage::open`] hands out single-use
//! [`EllipticsFile`] handles that fetch lazily on the first read and buffer
//! writes locally until `close` flushes them in one upload.

pub mod endpoint;
pub mod error;
pub mod file;
pub mod settings;
pub mod storage;

pub use error::{Error, Result};
pub use file::{AccessMode, EllipticsFile};
pub use settings::{Settings, SettingsOverrides};
pub use storage::EllipticsStorage;
