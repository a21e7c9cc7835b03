use chrono::{DateTime, Local, Utc};
use dioxus::prelude::*;
use dioxus_logger::tracing::error;
use futures::StreamExt;
use gloo_timers::future::TimeoutFuture;
use shared_types::{
    normalize_reply, ChatMessage, ChatRequest, ChatState, Outgoing, TranscriptEntry,
    TypingIndicator, TypingPhase, WidgetConfig,
};

use crate::api::send_chat_message;
use crate::interop::{
    focus_element, mounted_element, reset_input_height, resize_input_to_content, scroll_to_bottom,
};
use crate::styles::WIDGET_STYLES;
use crate::widget::{WidgetCommand, WidgetContext};

/// Fade-in delay of a new typing indicator, and fade-out time before removal
const TYPING_FADE_MS: u32 = 300;

#[component]
pub fn ChatWidget() -> Element {
    let context = use_context::<WidgetContext>();
    let mut config = use_signal(|| context.initial_config());
    let mut chat = use_signal(ChatState::default);
    let mut input_text = use_signal(String::new);
    let mut input_ref = use_signal(|| None::<web_sys::Element>);
    let mut list_ref = use_signal(|| None::<web_sys::Element>);

    // Configuration pushed through the page-facing handle
    let command_source = context.clone();
    use_hook(move || {
        let commands = command_source.take_commands();
        spawn(async move {
            let Some(mut commands) = commands else {
                return;
            };
            while let Some(command) = commands.next().await {
                match command {
                    WidgetCommand::Reconfigure(next) => config.set(next),
                }
            }
        })
    });

    // Keep the newest entry in view
    use_effect(move || {
        let _ = chat.read().entries().len();
        if let Some(list) = list_ref.read().as_ref() {
            scroll_to_bottom(list);
        }
    });

    let toggle = use_callback(move |_: ()| {
        let greeting = config.read().initial_message.clone();
        let open = chat.write().toggle(&greeting);
        if open {
            if let Some(input) = input_ref.read().as_ref() {
                focus_element(input);
            }
        }
    });

    let send_message = use_callback(move |_: ()| {
        let Some(Outgoing { text, indicator }) = chat.write().submit(&input_text.read()) else {
            return;
        };

        input_text.set(String::new());
        if let Some(input) = input_ref.read().as_ref() {
            reset_input_height(input);
        }

        spawn(async move {
            TimeoutFuture::new(TYPING_FADE_MS).await;
            chat.write().reveal_typing(indicator);
        });

        let (endpoint, timeout_ms, request) = {
            let current = config.read();
            (
                current.settings.api_endpoint,
                current.settings.request_timeout_ms,
                ChatRequest::new(&current, text),
            )
        };

        spawn(async move {
            let outcome = send_chat_message(endpoint, &request, timeout_ms)
                .await
                .map(|payload| normalize_reply(&payload));
            if let Err(e) = &outcome {
                error!("Error calling chatbot API: {}", e);
            }

            let fading = chat.write().finish_exchange(outcome);
            if let Some(id) = fading {
                TimeoutFuture::new(TYPING_FADE_MS).await;
                chat.write().remove_typing(id);
            }
        });
    });

    let onkeydown = move |e: KeyboardEvent| {
        if e.key() == Key::Enter && !e.modifiers().shift() {
            e.prevent_default();
            send_message.call(());
        }
    };

    let oninput = move |e: FormEvent| {
        input_text.set(e.value());
        let max_height = config.read().settings.input_max_height;
        if let Some(input) = input_ref.read().as_ref() {
            resize_input_to_content(input, max_height);
        }
    };

    let WidgetConfig {
        bot_name,
        bot_avatar,
        settings,
        ..
    } = config.read().clone();
    let is_open = chat.read().is_open();
    let position = settings.position.as_str();
    let theme = context.theme().to_string();

    rsx! {
        style { {WIDGET_STYLES} }

        div {
            class: "chatbot-widget position-{position}",
            style: "{theme}",

            Launcher { open: is_open, on_toggle: toggle }

            div {
                class: if is_open { "chat-panel open" } else { "chat-panel" },

                PanelHeader { bot_name, bot_avatar, on_minimize: toggle }

                div {
                    class: "chat-messages",
                    onmounted: move |e| list_ref.set(mounted_element(&e)),
                    for entry in chat.read().entries().iter() {
                        TranscriptRow { key: "{entry_key(entry)}", entry: entry.clone() }
                    }
                }

                div {
                    class: "chat-input-container",
                    textarea {
                        class: "chat-input",
                        placeholder: "Type your message...",
                        rows: "1",
                        value: "{input_text}",
                        onmounted: move |e| input_ref.set(mounted_element(&e)),
                        oninput,
                        onkeydown,
                    }
                    button {
                        class: "send-button",
                        r#type: "button",
                        "aria-label": "Send message",
                        onclick: move |_| send_message.call(()),
                        i { class: "fa-solid fa-paper-plane" }
                    }
                }
            }
        }
    }
}

#[component]
fn Launcher(open: bool, on_toggle: Callback<()>) -> Element {
    rsx! {
        button {
            class: if open { "chat-button open" } else { "chat-button" },
            r#type: "button",
            "aria-label": if open { "Close chat" } else { "Open chat" },
            onclick: move |_| on_toggle.call(()),
            i { class: "fa-solid fa-comment chat-icon" }
            i { class: "fa-solid fa-times close-icon" }
        }
    }
}

#[component]
fn PanelHeader(bot_name: String, bot_avatar: String, on_minimize: Callback<()>) -> Element {
    let context = use_context::<WidgetContext>();

    rsx! {
        div {
            class: "chat-header",
            onmounted: move |_| context.mark_header_mounted(),
            div {
                class: "chat-title",
                img { class: "bot-avatar", src: "{bot_avatar}", alt: "Bot Avatar" }
                span { "{bot_name}" }
            }
            button {
                class: "minimize-button",
                r#type: "button",
                "aria-label": "Minimize chat",
                onclick: move |_| on_minimize.call(()),
                i { class: "fa-solid fa-minus" }
            }
        }
    }
}

#[component]
fn TranscriptRow(entry: TranscriptEntry) -> Element {
    match entry {
        TranscriptEntry::Message(message) => rsx! { MessageBubble { message } },
        TranscriptEntry::Typing(indicator) => rsx! { TypingDots { indicator } },
    }
}

#[component]
pub fn MessageBubble(message: ChatMessage) -> Element {
    rsx! {
        div {
            class: "message {message.sender.css_class()}",
            div {
                class: "message-content",
                p { "{message.text}" }
            }
            div { class: "timestamp", "{format_timestamp(message.timestamp)}" }
        }
    }
}

#[component]
fn TypingDots(indicator: TypingIndicator) -> Element {
    rsx! {
        div {
            class: typing_class(indicator.phase),
            span {}
            span {}
            span {}
        }
    }
}

fn typing_class(phase: TypingPhase) -> &'static str {
    match phase {
        TypingPhase::Visible => "typing-indicator visible",
        TypingPhase::Entering | TypingPhase::Leaving => "typing-indicator",
    }
}

fn entry_key(entry: &TranscriptEntry) -> String {
    match entry {
        TranscriptEntry::Message(message) => format!("message-{}", message.id),
        TranscriptEntry::Typing(indicator) => format!("typing-{}", indicator.id),
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}
