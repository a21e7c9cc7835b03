use shared_types::{ColorError, WidgetSettings};

/// Accent shift applied on hover
const HOVER_SHADE: i16 = -20;

/// Inline custom properties for the widget root. Everything in
/// [`WIDGET_STYLES`] that depends on settings reads one of these.
pub fn theme_variables(settings: &WidgetSettings) -> Result<String, ColorError> {
    let accent = settings.accent()?;

    Ok([
        ("--cw-accent", accent.to_string()),
        ("--cw-accent-hover", accent.shade(HOVER_SHADE).to_string()),
        ("--cw-accent-ring", accent.rgba(0.2)),
        ("--cw-accent-glow", accent.rgba(0.3)),
        ("--cw-pulse-start", accent.rgba(0.4)),
        ("--cw-pulse-end", accent.rgba(0.0)),
        ("--cw-width", settings.width.to_string()),
        ("--cw-height", settings.height.to_string()),
        ("--cw-font-size", settings.font_size.to_string()),
    ]
    .iter()
    .map(|(name, value)| format!("{name}: {value};"))
    .collect::<Vec<_>>()
    .join(" "))
}

pub const WIDGET_STYLES: &str = r#"
/* Root */
.chatbot-widget {
    position: fixed;
    bottom: 20px;
    z-index: 9999;
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    font-size: var(--cw-font-size, 14px);
}

.chatbot-widget.position-right {
    right: 20px;
}

.chatbot-widget.position-left {
    left: 20px;
}

/* Launcher */
.chat-button {
    width: 60px;
    height: 60px;
    border-radius: 50%;
    background-color: var(--cw-accent);
    color: white;
    border: none;
    box-shadow: 0 4px 16px rgba(0, 0, 0, 0.2);
    cursor: pointer;
    display: flex;
    align-items: center;
    justify-content: center;
    font-size: 24px;
    position: relative;
    transition: all 0.3s cubic-bezier(0.175, 0.885, 0.32, 1.275);
    z-index: 10;
    overflow: hidden;
}

.chat-button:hover {
    transform: scale(1.08);
    box-shadow: 0 6px 20px rgba(0, 0, 0, 0.25);
    background-color: var(--cw-accent-hover);
}

.chat-button:active {
    transform: scale(0.95);
    box-shadow: 0 2px 10px rgba(0, 0, 0, 0.15);
}

.chat-button:not(.open) {
    animation: cw-pulse 2s infinite;
}

.chat-icon,
.close-icon {
    position: absolute;
    color: white;
    transition: all 0.4s cubic-bezier(0.68, -0.55, 0.27, 1.55);
}

.close-icon {
    opacity: 0;
    transform: rotate(-90deg) scale(0.5);
}

.chat-button.open .chat-icon {
    opacity: 0;
    transform: rotate(90deg) scale(0.5);
}

.chat-button.open .close-icon {
    opacity: 1;
    transform: rotate(0deg) scale(1);
}

@keyframes cw-pulse {
    0% { box-shadow: 0 0 0 0 var(--cw-pulse-start); }
    70% { box-shadow: 0 0 0 15px var(--cw-pulse-end); }
    100% { box-shadow: 0 0 0 0 var(--cw-pulse-end); }
}

/* Panel */
.chat-panel {
    position: absolute;
    bottom: 80px;
    width: var(--cw-width, 400px);
    height: var(--cw-height, 600px);
    background-color: white;
    border-radius: 16px;
    box-shadow: 0 8px 30px rgba(0, 0, 0, 0.25);
    display: flex;
    flex-direction: column;
    overflow: hidden;
    transition: all 0.4s cubic-bezier(0.165, 0.84, 0.44, 1);
    opacity: 0;
    transform: translateY(20px) scale(0.95);
    pointer-events: none;
    z-index: 999;
}

.position-right .chat-panel {
    right: 0;
}

.position-left .chat-panel {
    left: 0;
}

.chat-panel.open {
    opacity: 1;
    transform: translateY(0) scale(1);
    pointer-events: all;
}

/* Header */
.chat-header {
    background-color: var(--cw-accent);
    color: white;
    padding: 18px 20px;
    display: flex;
    justify-content: space-between;
    align-items: center;
    box-shadow: 0 2px 5px rgba(0, 0, 0, 0.1);
    position: relative;
    z-index: 1;
}

.chat-title {
    display: flex;
    align-items: center;
    gap: 12px;
    font-weight: bold;
    font-size: 16px;
}

.bot-avatar {
    width: 36px;
    height: 36px;
    border-radius: 50%;
    object-fit: cover;
    border: 2px solid rgba(255, 255, 255, 0.8);
    box-shadow: 0 2px 5px rgba(0, 0, 0, 0.1);
}

.minimize-button {
    background: transparent;
    border: none;
    color: white;
    cursor: pointer;
    font-size: 16px;
    width: 30px;
    height: 30px;
    border-radius: 50%;
    display: flex;
    align-items: center;
    justify-content: center;
    transition: background-color 0.2s ease;
}

.minimize-button:hover {
    background-color: rgba(255, 255, 255, 0.2);
}

/* Transcript */
.chat-messages {
    flex: 1;
    padding: 24px 20px;
    overflow-y: auto;
    display: flex;
    flex-direction: column;
    gap: 16px;
    background-color: #f8f9fa;
    scroll-behavior: smooth;
}

.message {
    display: flex;
    flex-direction: column;
    max-width: 75%;
    margin-bottom: 10px;
    animation: cw-message-in 0.3s ease;
}

@keyframes cw-message-in {
    from { opacity: 0; transform: translateY(10px); }
    to { opacity: 1; transform: translateY(0); }
}

.user-message {
    align-self: flex-end;
}

.bot-message {
    align-self: flex-start;
}

.message-content {
    padding: 12px 16px;
    border-radius: 18px;
    box-shadow: 0 1px 2px rgba(0, 0, 0, 0.1);
    position: relative;
    line-height: 1.5;
    word-wrap: break-word;
}

.message-content p {
    margin: 0;
    white-space: pre-wrap;
}

.user-message .message-content {
    background-color: var(--cw-accent);
    color: white;
    border-bottom-right-radius: 4px;
    margin-right: 8px;
}

.user-message .message-content::after {
    content: '';
    position: absolute;
    bottom: 0;
    right: -10px;
    width: 16px;
    height: 16px;
    background-color: var(--cw-accent);
    clip-path: polygon(0 0, 0% 100%, 100% 100%);
}

.bot-message .message-content {
    background-color: white;
    color: #333;
    border-bottom-left-radius: 4px;
    margin-left: 8px;
}

.bot-message .message-content::after {
    content: '';
    position: absolute;
    bottom: 0;
    left: -10px;
    width: 16px;
    height: 16px;
    background-color: white;
    clip-path: polygon(100% 0, 0% 100%, 100% 100%);
}

.timestamp {
    font-size: 10px;
    margin-top: 4px;
    opacity: 0.7;
    align-self: flex-end;
    color: #666;
}

.user-message .timestamp {
    padding-right: 8px;
}

.bot-message .timestamp {
    padding-left: 8px;
}

/* Typing Indicator */
.typing-indicator {
    align-self: flex-start;
    background-color: white;
    padding: 12px 20px;
    border-radius: 18px;
    border-bottom-left-radius: 4px;
    box-shadow: 0 1px 2px rgba(0, 0, 0, 0.1);
    margin-top: 5px;
    position: relative;
    opacity: 0;
    transition: opacity 0.3s ease;
}

.typing-indicator.visible {
    opacity: 1;
}

.typing-indicator span {
    height: 8px;
    width: 8px;
    float: left;
    margin: 0 1px;
    background-color: #9e9ea1;
    display: block;
    border-radius: 50%;
    opacity: 0.4;
}

.typing-indicator span:nth-of-type(1) { animation: 1s cw-blink infinite 0.3333s; }
.typing-indicator span:nth-of-type(2) { animation: 1s cw-blink infinite 0.6666s; }
.typing-indicator span:nth-of-type(3) { animation: 1s cw-blink infinite 0.9999s; }

.typing-indicator::before {
    content: '';
    position: absolute;
    bottom: -2px;
    left: -7px;
    width: 12px;
    height: 12px;
    background-color: white;
    border-radius: 50%;
    z-index: -1;
}

@keyframes cw-blink {
    0% { opacity: 0.4; transform: translateY(0); }
    50% { opacity: 1; transform: translateY(-3px); }
    100% { opacity: 0.4; transform: translateY(0); }
}

/* Input Row */
.chat-input-container {
    display: flex;
    padding: 18px;
    border-top: 1px solid #eee;
    background-color: white;
    position: relative;
}

.chat-input {
    flex: 1;
    border: 1px solid #ddd;
    border-radius: 20px;
    padding: 14px 18px;
    resize: none;
    outline: none;
    max-height: 120px;
    font-size: 15px;
    font-family: inherit;
    transition: border-color 0.3s ease;
}

.chat-input:focus {
    border-color: var(--cw-accent);
    box-shadow: 0 0 0 2px var(--cw-accent-ring);
}

.send-button {
    margin-left: 10px;
    width: 40px;
    height: 40px;
    border-radius: 50%;
    background-color: var(--cw-accent);
    color: white;
    border: none;
    display: flex;
    align-items: center;
    justify-content: center;
    cursor: pointer;
    flex-shrink: 0;
    transition: all 0.2s ease;
    box-shadow: 0 2px 5px var(--cw-accent-glow);
}

.send-button:hover {
    background-color: var(--cw-accent-hover);
    transform: scale(1.05);
}

.send-button:active {
    transform: scale(0.95);
}

.send-button:disabled {
    background-color: #ccc;
    cursor: not-allowed;
    box-shadow: none;
}

@media (max-width: 480px) {
    .chat-panel {
        width: calc(100vw - 40px);
        height: 80vh;
    }

    .message {
        max-width: 85%;
    }
}

@media (prefers-color-scheme: dark) {
    .bot-message .message-content,
    .bot-message .message-content::after,
    .typing-indicator,
    .typing-indicator::before {
        background-color: #2a2a2a;
    }

    .bot-message .message-content {
        color: #f0f0f0;
    }

    .chat-messages {
        background-color: #1a1a1a;
    }

    .chat-input-container {
        background-color: #2a2a2a;
        border-top: 1px solid #444;
    }

    .chat-input {
        background-color: #333;
        color: #f0f0f0;
        border-color: #555;
    }

    .timestamp {
        color: #aaa;
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_variables_follow_default_accent() {
        let vars = theme_variables(&WidgetSettings::default()).unwrap();
        assert!(vars.contains("--cw-accent: #4a6cf7;"));
        assert!(vars.contains("--cw-accent-hover: #3658e3;"));
        assert!(vars.contains("--cw-accent-ring: rgba(74, 108, 247, 0.2);"));
        assert!(vars.contains("--cw-pulse-end: rgba(74, 108, 247, 0);"));
        assert!(vars.contains("--cw-width: 400px;"));
    }

    #[test]
    fn every_variable_used_by_the_stylesheet_is_defined() {
        let vars = theme_variables(&WidgetSettings::default()).unwrap();
        for used in WIDGET_STYLES.split("var(").skip(1) {
            let name = used
                .split(|c: char| c == ',' || c == ')')
                .next()
                .unwrap_or_default()
                .trim();
            assert!(vars.contains(&format!("{name}:")), "{name} is not defined");
        }
    }

    #[test]
    fn invalid_accent_is_rejected() {
        let settings = WidgetSettings {
            accent_color: "#zzzzzz",
            ..WidgetSettings::default()
        };
        assert!(theme_variables(&settings).is_err());
    }
}
