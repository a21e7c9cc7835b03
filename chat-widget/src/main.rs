use chat_widget::ChatbotWidget;

/// Demo host for `dx serve`: mounts the widget with a sample configuration.
fn main() {
    let options = serde_json::json!({
        "chatbot_id": "BUS-1143",
        "botName": "Sarah",
        "initialMessage": "Hi there! How can I help you today?",
    });

    let Ok(options) = js_sys::JSON::parse(&options.to_string()) else {
        return;
    };

    if let Some(widget) = ChatbotWidget::init(options) {
        // Keep the update channel open for the lifetime of the page
        std::mem::forget(widget);
    }
}
