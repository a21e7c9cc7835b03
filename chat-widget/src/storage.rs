use dioxus_logger::tracing::warn;
use shared_types::SessionStore;

/// Session token persisted in `window.localStorage`
#[derive(Debug, Clone)]
pub struct LocalSessionStore {
    key: &'static str,
}

impl LocalSessionStore {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

impl SessionStore for LocalSessionStore {
    fn load(&self) -> Option<String> {
        local_storage()
            .and_then(|storage| storage.get_item(self.key).ok().flatten())
            .filter(|key| !key.is_empty())
    }

    fn save(&self, session_key: &str) {
        let Some(storage) = local_storage() else {
            warn!("localStorage unavailable; session will not survive a reload");
            return;
        };

        if let Err(e) = storage.set_item(self.key, session_key) {
            warn!("Failed to persist session key: {:?}", e);
        }
    }
}
