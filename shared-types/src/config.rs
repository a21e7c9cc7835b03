//! Widget configuration: fixed settings plus the owner-supplied allow-list.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use crate::color::{ColorError, Rgb};
use crate::session::{resolve_session, SessionStore};

/// Required owner fields, checked in this order: (struct field, public key)
const REQUIRED_FIELDS: [(&str, &str); 3] = [
    ("chatbot_id", "chatbot_id"),
    ("bot_name", "botName"),
    ("initial_message", "initialMessage"),
];

const CHATBOT_ID_ALIAS: &str = "chatbotId";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("malformed configuration: {0}")]
    Malformed(String),

    #[error("invalid accent color: {0}")]
    Accent(#[from] ColorError),
}

/// Which bottom corner the launcher sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Left,
    Right,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Right => "right",
        }
    }
}

/// Static configuration. Not settable by website owners.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSettings {
    pub api_endpoint: &'static str,
    /// `#rrggbb`
    pub accent_color: &'static str,
    pub position: Position,
    pub width: &'static str,
    pub height: &'static str,
    pub font_size: &'static str,
    pub default_avatar: &'static str,
    pub icon_stylesheet: &'static str,
    /// localStorage key holding the session token
    pub storage_key: &'static str,
    /// Upper bound for the auto-growing input, in pixels
    pub input_max_height: i32,
    pub request_timeout_ms: u32,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            api_endpoint: "https://a1b1-39-47-51-227.ngrok-free.app/chat/api/chat/",
            accent_color: "#4a6cf7",
            position: Position::Right,
            width: "400px",
            height: "600px",
            font_size: "14px",
            default_avatar: "https://images.pexels.com/photos/2599244/pexels-photo-2599244.jpeg?auto=compress&cs=tinysrgb&w=600",
            icon_stylesheet: "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css",
            storage_key: "chatbotSessionKey",
            input_max_height: 100,
            request_timeout_ms: 30_000,
        }
    }
}

impl WidgetSettings {
    pub fn accent(&self) -> Result<Rgb, ColorError> {
        self.accent_color.parse()
    }
}

/// The keys a website owner may set. Anything else in the input is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../chat-widget/bindings/widget.ts")]
pub struct OwnerConfig {
    #[serde(
        rename = "chatbot_id",
        alias = "chatbotId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(required, length(min = 1))]
    #[ts(optional)]
    pub chatbot_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(required, length(min = 1))]
    #[ts(optional)]
    pub bot_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(required, length(min = 1))]
    #[ts(optional)]
    pub initial_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub bot_avatar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub session_key: Option<String>,
}

impl OwnerConfig {
    /// Decode the JSON form of the object handed in by the embedding page.
    /// `null` is treated as an empty mapping. An explicit `null` for a
    /// required key clears it, which fails like an absent field.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        if value.is_null() {
            return Ok(Self::default());
        }

        if let Some(fields) = value.as_object() {
            for (field, public) in REQUIRED_FIELDS {
                let is_null = |key: &str| fields.get(key).is_some_and(serde_json::Value::is_null);
                if is_null(public) || (field == "chatbot_id" && is_null(CHATBOT_ID_ALIAS)) {
                    return Err(ConfigError::MissingField(public));
                }
            }
        }

        serde_json::from_value(value).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Fields present in `input` replace ours.
    pub fn overlay(self, input: OwnerConfig) -> Self {
        Self {
            chatbot_id: input.chatbot_id.or(self.chatbot_id),
            bot_name: input.bot_name.or(self.bot_name),
            initial_message: input.initial_message.or(self.initial_message),
            bot_avatar: input.bot_avatar.or(self.bot_avatar),
            session_key: input.session_key.or(self.session_key),
        }
    }

    fn check_required(&self) -> Result<(), ConfigError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };

        let fields = errors.field_errors();
        for (field, public) in REQUIRED_FIELDS {
            if fields.contains_key(field) {
                return Err(ConfigError::MissingField(public));
            }
        }
        Ok(())
    }
}

/// Resolved configuration owned by one widget instance
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub chatbot_id: String,
    pub bot_name: String,
    pub initial_message: String,
    pub bot_avatar: String,
    pub session_key: String,
    pub settings: WidgetSettings,
}

/// Which header fields an update supplied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub bot_name: bool,
    pub bot_avatar: bool,
}

impl WidgetConfig {
    /// Merge owner input over the defaults, validate it and resolve the session.
    ///
    /// Nothing is persisted when validation fails.
    pub fn configure(
        input: OwnerConfig,
        settings: WidgetSettings,
        sessions: &dyn SessionStore,
    ) -> Result<Self, ConfigError> {
        settings.accent()?;
        input.check_required()?;

        let session_key = resolve_session(input.session_key.as_deref(), sessions);
        Ok(Self::assemble(input, session_key, settings))
    }

    /// Apply a partial update. A rejected update leaves `self` untouched.
    pub fn update(
        &mut self,
        mut input: OwnerConfig,
        sessions: &dyn SessionStore,
    ) -> Result<ConfigUpdate, ConfigError> {
        if let Some(id) = input.chatbot_id.take() {
            if id != self.chatbot_id {
                tracing::warn!("chatbot_id is immutable once set; ignoring '{id}'");
            }
        }

        let supplied = ConfigUpdate {
            bot_name: input.bot_name.is_some(),
            bot_avatar: input.bot_avatar.is_some(),
        };

        let merged = self.owner_view().overlay(input);
        merged.check_required()?;

        let session_key = resolve_session(merged.session_key.as_deref(), sessions);
        *self = Self::assemble(merged, session_key, self.settings.clone());
        Ok(supplied)
    }

    fn owner_view(&self) -> OwnerConfig {
        OwnerConfig {
            chatbot_id: Some(self.chatbot_id.clone()),
            bot_name: Some(self.bot_name.clone()),
            initial_message: Some(self.initial_message.clone()),
            bot_avatar: Some(self.bot_avatar.clone()),
            session_key: Some(self.session_key.clone()),
        }
    }

    fn assemble(input: OwnerConfig, session_key: String, settings: WidgetSettings) -> Self {
        let bot_avatar = input
            .bot_avatar
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| settings.default_avatar.to_string());

        Self {
            chatbot_id: input.chatbot_id.unwrap_or_default(),
            bot_name: input.bot_name.unwrap_or_default(),
            initial_message: input.initial_message.unwrap_or_default(),
            bot_avatar,
            session_key,
            settings,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(chatbot_id: &str, session_key: &str) -> Self {
        Self {
            chatbot_id: chatbot_id.to_string(),
            bot_name: "Sarah".to_string(),
            initial_message: "Hi there!".to_string(),
            bot_avatar: WidgetSettings::default().default_avatar.to_string(),
            session_key: session_key.to_string(),
            settings: WidgetSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn owner(json: &str) -> OwnerConfig {
        OwnerConfig::from_json(json).unwrap()
    }

    fn valid_input() -> OwnerConfig {
        owner(r#"{"chatbot_id":"BUS-1143","botName":"Sarah","initialMessage":"Hi there!"}"#)
    }

    #[test]
    fn configure_merges_owner_fields_over_defaults() {
        let store = MemorySessionStore::default();
        let config =
            WidgetConfig::configure(valid_input(), WidgetSettings::default(), &store).unwrap();

        assert_eq!(config.chatbot_id, "BUS-1143");
        assert_eq!(config.bot_name, "Sarah");
        assert_eq!(config.initial_message, "Hi there!");
        assert_eq!(config.bot_avatar, WidgetSettings::default().default_avatar);
        assert!(config.session_key.starts_with("session_"));
        assert_eq!(store.load().as_deref(), Some(config.session_key.as_str()));
    }

    #[test]
    fn configure_accepts_camel_case_chatbot_id() {
        let input = owner(r#"{"chatbotId":"BUS-9","botName":"A","initialMessage":"B"}"#);
        assert_eq!(input.chatbot_id.as_deref(), Some("BUS-9"));
    }

    #[test]
    fn missing_required_field_fails_and_persists_nothing() {
        let cases = [
            (r#"{"botName":"A","initialMessage":"B"}"#, "chatbot_id"),
            (r#"{"chatbot_id":"X","initialMessage":"B"}"#, "botName"),
            (r#"{"chatbot_id":"X","botName":"A"}"#, "initialMessage"),
            (r#"{"chatbot_id":"","botName":"A","initialMessage":"B"}"#, "chatbot_id"),
            (r#"{"chatbot_id":"X","botName":"","initialMessage":""}"#, "botName"),
            ("{}", "chatbot_id"),
            ("null", "chatbot_id"),
        ];

        for (json, field) in cases {
            let store = MemorySessionStore::default();
            let err = WidgetConfig::configure(owner(json), WidgetSettings::default(), &store)
                .unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingField(f) if f == field),
                "{json}: {err}"
            );
            assert_eq!(store.load(), None, "{json}");
        }
    }

    #[test]
    fn unlisted_keys_are_ignored() {
        let with_extras = owner(
            r##"{"chatbot_id":"BUS-1143","botName":"Sarah","initialMessage":"Hi there!",
                "apiEndpoint":"https://evil.example","chatbotAccentColor":"#000000","width":"9px"}"##,
        );
        assert_eq!(with_extras, valid_input());

        let store = MemorySessionStore::default();
        let config = WidgetConfig::configure(with_extras, WidgetSettings::default(), &store).unwrap();
        assert_eq!(config.settings, WidgetSettings::default());
    }

    #[test]
    fn wrong_typed_value_is_malformed() {
        let err = OwnerConfig::from_json(r#"{"botName":5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));

        let err = OwnerConfig::from_json("[1,2]").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn explicit_session_key_wins_over_stored() {
        let store = MemorySessionStore::with_key("session_old");
        let mut input = valid_input();
        input.session_key = Some("session_explicit".into());

        let config = WidgetConfig::configure(input, WidgetSettings::default(), &store).unwrap();
        assert_eq!(config.session_key, "session_explicit");
        assert_eq!(store.load().as_deref(), Some("session_explicit"));
    }

    #[test]
    fn invalid_accent_blocks_configuration() {
        let settings = WidgetSettings {
            accent_color: "purple",
            ..WidgetSettings::default()
        };
        let err = WidgetConfig::configure(valid_input(), settings, &MemorySessionStore::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Accent(_)));
    }

    #[test]
    fn update_reports_supplied_header_fields() {
        let store = MemorySessionStore::default();
        let mut config =
            WidgetConfig::configure(valid_input(), WidgetSettings::default(), &store).unwrap();

        let supplied = config
            .update(owner(r#"{"botName":"Max","botAvatar":"https://a/b.png"}"#), &store)
            .unwrap();
        assert_eq!(
            supplied,
            ConfigUpdate {
                bot_name: true,
                bot_avatar: true
            }
        );
        assert_eq!(config.bot_name, "Max");
        assert_eq!(config.bot_avatar, "https://a/b.png");
        assert_eq!(config.initial_message, "Hi there!");
    }

    #[test]
    fn rejected_update_leaves_config_untouched() {
        let store = MemorySessionStore::default();
        let mut config =
            WidgetConfig::configure(valid_input(), WidgetSettings::default(), &store).unwrap();
        let before = config.clone();

        let err = config.update(owner(r#"{"botName":""}"#), &store).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("botName")));
        assert_eq!(config, before);
    }

    #[test]
    fn explicit_null_clears_required_field() {
        let store = MemorySessionStore::default();
        let mut config =
            WidgetConfig::configure(valid_input(), WidgetSettings::default(), &store).unwrap();
        let before = config.clone();

        for (json, field) in [
            (r#"{"botName":null}"#, "botName"),
            (r#"{"initialMessage":null}"#, "initialMessage"),
            (r#"{"chatbotId":null}"#, "chatbot_id"),
        ] {
            let err = OwnerConfig::from_json(json)
                .and_then(|input| config.update(input, &store))
                .unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingField(f) if f == field),
                "{json}: {err}"
            );
        }
        assert_eq!(config, before);

        let input = owner(r#"{"botAvatar":null,"sessionKey":null}"#);
        assert_eq!(input, OwnerConfig::default());
    }

    #[test]
    fn update_keeps_chatbot_id_and_persists_new_session() {
        let store = MemorySessionStore::default();
        let mut config =
            WidgetConfig::configure(valid_input(), WidgetSettings::default(), &store).unwrap();

        config
            .update(
                owner(r#"{"chatbot_id":"OTHER","sessionKey":"session_rotated"}"#),
                &store,
            )
            .unwrap();
        assert_eq!(config.chatbot_id, "BUS-1143");
        assert_eq!(config.session_key, "session_rotated");
        assert_eq!(store.load().as_deref(), Some("session_rotated"));
    }

    #[test]
    fn empty_avatar_falls_back_to_default() {
        let mut input = valid_input();
        input.bot_avatar = Some(String::new());
        let config =
            WidgetConfig::configure(input, WidgetSettings::default(), &MemorySessionStore::default())
                .unwrap();
        assert_eq!(config.bot_avatar, WidgetSettings::default().default_avatar);
    }
}
