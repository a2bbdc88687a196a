//! Player preferences
//!
//! Only the mute flag survives a page reload; it is persisted as
//! `"true"`/`"false"` under `MUTED_KEY`.

use crate::config::MUTED_KEY;
use crate::persistence::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// All audio silenced
    pub muted: bool,
}

impl Settings {
    /// Parse a stored flag. Anything but `"true"` means unmuted.
    pub fn parse_muted(raw: Option<&str>) -> bool {
        raw == Some("true")
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let muted = Self::parse_muted(store.get(MUTED_KEY).as_deref());
        log::info!("Loaded settings (muted: {})", muted);
        Self { muted }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        store.set(MUTED_KEY, if self.muted { "true" } else { "false" });
    }

    /// Flip mute and write it through. Returns the new value.
    pub fn toggle_mute<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> bool {
        self.muted = !self.muted;
        self.save(store);
        log::info!("Muted: {}", self.muted);
        self.muted
    }
}
