//! Session token resolution: explicit override, then persisted value, then a fresh key.

use std::cell::RefCell;

use chrono::Utc;

/// Persistent home of the session token (browser localStorage in the widget)
pub trait SessionStore {
    fn load(&self) -> Option<String>;
    fn save(&self, session_key: &str);
}

/// In-process store, used off-browser and in tests
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    key: RefCell<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_key(key: &str) -> Self {
        Self {
            key: RefCell::new(Some(key.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<String> {
        self.key.borrow().clone()
    }

    fn save(&self, session_key: &str) {
        *self.key.borrow_mut() = Some(session_key.to_string());
    }
}

/// Pick the session token and persist it, overwriting whatever was stored.
pub fn resolve_session(explicit: Option<&str>, store: &dyn SessionStore) -> String {
    let key = match explicit.filter(|k| !k.is_empty()) {
        Some(key) => key.to_string(),
        None => match store.load().filter(|k| !k.is_empty()) {
            Some(stored) => {
                tracing::debug!("restored session {stored}");
                stored
            }
            None => {
                let fresh = generate_session_key();
                tracing::debug!("generated session {fresh}");
                fresh
            }
        },
    };

    store.save(&key);
    key
}

/// `session_<unix millis>_<8 base36 chars>`
pub fn generate_session_key() -> String {
    format_session_key(Utc::now().timestamp_millis(), uuid::Uuid::new_v4().as_u128())
}

fn format_session_key(timestamp_ms: i64, entropy: u128) -> String {
    format!("session_{timestamp_ms}_{}", base36(entropy, 8))
}

fn base36(mut n: u128, width: usize) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::with_capacity(width);
    for _ in 0..width {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_has_timestamp_and_base36_fragment() {
        assert_eq!(format_session_key(1_700_000_000_000, 0), "session_1700000000000_00000000");
        assert_eq!(format_session_key(5, 35), "session_5_0000000z");
        assert_eq!(format_session_key(5, 36), "session_5_00000010");
    }

    #[test]
    fn generated_keys_match_format() {
        let key = generate_session_key();
        let parts: Vec<&str> = key.splitn(3, '_').collect();
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().unwrap() > 0);
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(key, generate_session_key());
    }

    #[test]
    fn resolution_is_stable_across_loads() {
        let store = MemorySessionStore::default();
        let first = resolve_session(None, &store);
        let second = resolve_session(None, &store);
        let third = resolve_session(None, &store);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn explicit_key_overrides_and_is_persisted() {
        let store = MemorySessionStore::with_key("session_1_stored00");
        assert_eq!(resolve_session(Some("mine"), &store), "mine");
        assert_eq!(store.load().as_deref(), Some("mine"));
        assert_eq!(resolve_session(None, &store), "mine");
    }

    #[test]
    fn empty_values_count_as_unset() {
        let store = MemorySessionStore::with_key("");
        let key = resolve_session(Some(""), &store);
        assert!(key.starts_with("session_"));
        assert_eq!(store.load(), Some(key));
    }
}
