//! # Scrape Cache
//!
//! Persistent key-value stores that make scraping runs incremental and
//! resumable. Every store is read-through/write-through: a lookup checks the
//! store first, and a freshly computed value is persisted before the caller
//! moves on.
//!
//! ## Architecture
//!
//! - **CacheStore**: trait for a single key namespace
//! - **FileCache**: `bincode` file on local disk, rewritten after every `put`
//! - **MemoryCache**: in-process store for tests and dry runs
//!
//! ## Usage
//!
//! ```rust
//! use scrape_cache::{CacheStore, FileCache};
//! use tempfile::TempDir;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let temp_dir = TempDir::new()?;
//!     let path = temp_dir.path().join("links.bin");
//!
//!     let mut cache: FileCache<u16, Vec<String>> = FileCache::open(&path)?;
//!     cache.put(2020, vec!["/arsenal-fc/startseite/verein/11".to_string()])?;
//!
//!     let reopened: FileCache<u16, Vec<String>> = FileCache::open(&path)?;
//!     assert_eq!(reopened.len(), 1);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{CacheError, Result};
pub use file::FileCache;
pub use memory::MemoryCache;
pub use store::CacheStore;
