//! Folio Theme
//!
//! Light/dark preference for the page, seeded from persisted storage on load
//! and written back on every toggle.
//!
//! # Quick Start
//!
//! ```rust
//! use folio_theme::{MemoryStorage, ThemePreference, ThemeStore};
//! use std::rc::Rc;
//!
//! let storage = Rc::new(MemoryStorage::new());
//! let theme = ThemeStore::load(storage.clone());
//! assert_eq!(theme.preference(), ThemePreference::Light);
//!
//! theme.toggle();
//! assert_eq!(theme.preference(), ThemePreference::Dark);
//! assert_eq!(storage.get("theme").as_deref(), Some("dark"));
//! ```
//!
//! # Failure handling
//!
//! Storage is best effort. If it cannot be read the store starts from the
//! default; if a write fails the store drops to in-memory mode for the rest of
//! the session. Neither case is reported to the caller.

pub mod preference;
pub mod storage;
pub mod store;

pub use preference::{ParsePreferenceError, ThemePreference};
pub use storage::{FileStorage, MemoryStorage, PreferenceStorage, StorageError};
pub use store::{ThemeStore, THEME_STORAGE_KEY};
