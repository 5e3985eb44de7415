//! Theme store
//!
//! Owns the page's light/dark preference for the lifetime of a page load. The
//! store is created once by the host and handed to consumers (usually as
//! `Rc<ThemeStore>`), rather than reached through global state.
//!
//! Every change runs the registered listeners, which is how the host keeps the
//! document-level style attribute (`class="dark"`) in sync.

use crate::preference::ThemePreference;
use crate::storage::{PreferenceStorage, StorageError};
use std::cell::{Cell, RefCell};

/// Key of the persisted preference entry
pub const THEME_STORAGE_KEY: &str = "theme";

type Listener = Box<dyn Fn(ThemePreference)>;

pub struct ThemeStore {
    preference: Cell<ThemePreference>,

    /// `None` once storage has failed; the store is then in-memory only
    storage: RefCell<Option<Box<dyn PreferenceStorage>>>,

    listeners: RefCell<Vec<Listener>>,
}

impl ThemeStore {
    /// Seed the store from persisted storage.
    ///
    /// Missing or unrecognised values fall back to [`ThemePreference::Light`]
    /// and are overwritten by the next change. Storage that cannot be reached
    /// additionally puts the store in in-memory mode.
    pub fn load(storage: impl PreferenceStorage + 'static) -> Self {
        let storage: Box<dyn PreferenceStorage> = Box::new(storage);

        let (preference, storage) = match storage.read(THEME_STORAGE_KEY) {
            Ok(Some(raw)) => match raw.parse::<ThemePreference>() {
                Ok(preference) => (preference, Some(storage)),
                Err(err) => {
                    tracing::warn!("theme: {}, using default", err);
                    (ThemePreference::default(), Some(storage))
                }
            },
            Ok(None) => (ThemePreference::default(), Some(storage)),
            Err(err @ StorageError::Decode(_)) => {
                tracing::warn!("theme: {}, using default", err);
                (ThemePreference::default(), Some(storage))
            }
            Err(err) => {
                tracing::warn!("theme: storage unreadable ({}), keeping theme in memory", err);
                (ThemePreference::default(), None)
            }
        };

        tracing::debug!("theme: loaded preference {}", preference);

        Self {
            preference: Cell::new(preference),
            storage: RefCell::new(storage),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Store without persistence
    pub fn in_memory(preference: ThemePreference) -> Self {
        Self {
            preference: Cell::new(preference),
            storage: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Current preference
    pub fn preference(&self) -> ThemePreference {
        self.preference.get()
    }

    /// Flip between light and dark, persist, and notify listeners.
    ///
    /// Returns the new preference.
    pub fn toggle(&self) -> ThemePreference {
        let next = self.preference().toggle();
        self.apply(next);
        next
    }

    /// Set the preference. No-op if it is already current.
    pub fn set(&self, preference: ThemePreference) {
        if self.preference() != preference {
            self.apply(preference);
        }
    }

    /// Whether changes are still being written to storage
    pub fn is_persistent(&self) -> bool {
        self.storage.borrow().is_some()
    }

    /// Class applied to the document root: `"dark"` or empty
    pub fn root_class(&self) -> &'static str {
        if self.preference().is_dark() {
            "dark"
        } else {
            ""
        }
    }

    /// Run `listener` on every change.
    ///
    /// Listeners must not register further listeners from inside the callback.
    pub fn on_change(&self, listener: impl Fn(ThemePreference) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    fn apply(&self, preference: ThemePreference) {
        tracing::debug!("theme: {} -> {}", self.preference(), preference);
        self.preference.set(preference);
        self.persist(preference);

        for listener in self.listeners.borrow().iter() {
            listener(preference);
        }
    }

    fn persist(&self, preference: ThemePreference) {
        let mut storage = self.storage.borrow_mut();
        let Some(backend) = storage.as_ref() else {
            return;
        };

        let written = backend.write(THEME_STORAGE_KEY, preference.as_str());
        if let Err(err) = written {
            tracing::warn!(
                "theme: failed to persist preference ({}), keeping theme in memory",
                err
            );
            *storage = None;
        }
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::in_memory(ThemePreference::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::rc::Rc;

    #[test]
    fn test_no_entry_defaults_to_light() {
        let store = ThemeStore::load(MemoryStorage::new());
        assert_eq!(store.preference(), ThemePreference::Light);
        assert!(store.is_persistent());
    }

    #[test]
    fn test_seeded_from_storage() {
        let store = ThemeStore::load(MemoryStorage::new().with_entry(THEME_STORAGE_KEY, "dark"));
        assert_eq!(store.preference(), ThemePreference::Dark);
        assert_eq!(store.root_class(), "dark");
    }

    #[test]
    fn test_invalid_entry_defaults_to_light() {
        let store = ThemeStore::load(MemoryStorage::new().with_entry(THEME_STORAGE_KEY, "sepia"));
        assert_eq!(store.preference(), ThemePreference::Light);
        assert!(store.is_persistent());
    }

    #[test]
    fn test_toggle_persists() {
        let storage = Rc::new(MemoryStorage::new());
        let store = ThemeStore::load(storage.clone());

        assert_eq!(store.toggle(), ThemePreference::Dark);
        assert_eq!(storage.get(THEME_STORAGE_KEY).as_deref(), Some("dark"));

        assert_eq!(store.toggle(), ThemePreference::Light);
        assert_eq!(storage.get(THEME_STORAGE_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_disabled_storage_falls_back_to_memory() {
        let store = ThemeStore::load(MemoryStorage::disabled());
        assert_eq!(store.preference(), ThemePreference::Light);
        assert!(!store.is_persistent());

        assert_eq!(store.toggle(), ThemePreference::Dark);
        assert_eq!(store.preference(), ThemePreference::Dark);
    }

    #[test]
    fn test_write_failure_switches_to_memory() {
        let storage = Rc::new(MemoryStorage::new());
        let store = ThemeStore::load(storage.clone());

        storage.fill();
        assert_eq!(store.toggle(), ThemePreference::Dark);
        assert!(!store.is_persistent());
        assert_eq!(storage.get(THEME_STORAGE_KEY), None);

        // Still toggles in memory
        assert_eq!(store.toggle(), ThemePreference::Light);
    }

    #[test]
    fn test_listeners_see_every_change() {
        let store = ThemeStore::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.on_change(move |preference| sink.borrow_mut().push(preference));

        store.toggle();
        store.set(ThemePreference::Dark);
        store.set(ThemePreference::Light);

        assert_eq!(
            *seen.borrow(),
            vec![ThemePreference::Dark, ThemePreference::Light]
        );
    }
}
