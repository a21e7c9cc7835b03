//! `ChatbotWidget`: the handle exposed to the embedding page.
//!
//! ```js
//! const widget = ChatbotWidget.init({
//!     chatbot_id: "BUS-1143",
//!     botName: "Sarah",
//!     initialMessage: "Hi there! How can I help you today?",
//! });
//! widget?.updateConfig({ botName: "Max" });
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use dioxus::dioxus_core::VirtualDom;
use dioxus_logger::tracing::{error, info, warn, Level};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use shared_types::{ColorError, ConfigError, OwnerConfig, WidgetConfig, WidgetSettings};
use wasm_bindgen::prelude::*;

use crate::components::ChatWidget;
use crate::interop::{create_container, ensure_stylesheet};
use crate::storage::LocalSessionStore;
use crate::styles::theme_variables;

const WIDGET_ROOT_ID: &str = "chatbot-widget";
const ICON_STYLESHEET_MARKER: &str = "font-awesome";

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("DOM assembly failed: {0}")]
    Dom(String),
}

impl From<JsValue> for WidgetError {
    fn from(value: JsValue) -> Self {
        Self::Dom(format!("{value:?}"))
    }
}

/// Messages from the handle to the mounted component tree
#[derive(Debug, Clone)]
pub enum WidgetCommand {
    Reconfigure(WidgetConfig),
}

/// Root context shared by the handle and the rendered widget
#[derive(Clone)]
pub struct WidgetContext {
    inner: Rc<ContextInner>,
}

struct ContextInner {
    initial_config: WidgetConfig,
    theme: String,
    commands: RefCell<Option<UnboundedReceiver<WidgetCommand>>>,
    header_mounted: Cell<bool>,
}

impl WidgetContext {
    fn new(
        initial_config: WidgetConfig,
        theme: String,
        commands: UnboundedReceiver<WidgetCommand>,
    ) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                initial_config,
                theme,
                commands: RefCell::new(Some(commands)),
                header_mounted: Cell::new(false),
            }),
        }
    }

    pub fn initial_config(&self) -> WidgetConfig {
        self.inner.initial_config.clone()
    }

    /// Inline custom properties for the root element
    pub fn theme(&self) -> &str {
        &self.inner.theme
    }

    /// The command stream; only the first caller gets it.
    pub fn take_commands(&self) -> Option<UnboundedReceiver<WidgetCommand>> {
        self.inner.commands.borrow_mut().take()
    }

    pub fn mark_header_mounted(&self) {
        self.inner.header_mounted.set(true);
    }

    fn header_mounted(&self) -> bool {
        self.inner.header_mounted.get()
    }
}

fn init_logging() {
    static LOGGER: Once = Once::new();
    LOGGER.call_once(|| {
        dioxus_logger::init(Level::INFO).ok();
    });
}

fn owner_config_from_js(options: &JsValue) -> Result<OwnerConfig, ConfigError> {
    if options.is_undefined() || options.is_null() {
        return Ok(OwnerConfig::default());
    }

    let json = js_sys::JSON::stringify(options)
        .map_err(|e| ConfigError::Malformed(format!("{e:?}")))?;
    OwnerConfig::from_json(&String::from(json))
}

#[wasm_bindgen]
pub struct ChatbotWidget {
    config: WidgetConfig,
    store: LocalSessionStore,
    context: WidgetContext,
    commands: UnboundedSender<WidgetCommand>,
}

#[wasm_bindgen]
impl ChatbotWidget {
    /// Validate `options`, resolve the session and mount the widget.
    /// Returns `undefined` when the configuration is rejected.
    pub fn init(options: JsValue) -> Option<ChatbotWidget> {
        init_logging();

        match Self::mount(&options) {
            Ok(widget) => Some(widget),
            Err(e) => {
                error!("ChatbotWidget initialization failed: {e}");
                None
            }
        }
    }

    /// Apply a partial configuration. Returns `false` if it is rejected.
    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&mut self, options: JsValue) -> bool {
        let supplied = match owner_config_from_js(&options)
            .and_then(|input| self.config.update(input, &self.store))
        {
            Ok(supplied) => supplied,
            Err(e) => {
                error!("ChatbotWidget configuration update failed: {e}");
                return false;
            }
        };

        if !self.context.header_mounted() {
            if supplied.bot_name {
                warn!("Chatbot Widget: Bot name element not found in DOM");
            }
            if supplied.bot_avatar {
                warn!("Chatbot Widget: Bot avatar element not found in DOM");
            }
        }

        if self
            .commands
            .unbounded_send(WidgetCommand::Reconfigure(self.config.clone()))
            .is_err()
        {
            warn!("Chatbot Widget: widget is no longer mounted");
        }

        true
    }

    #[wasm_bindgen(getter, js_name = sessionKey)]
    pub fn session_key(&self) -> String {
        self.config.session_key.clone()
    }
}

impl ChatbotWidget {
    fn mount(options: &JsValue) -> Result<Self, WidgetError> {
        let input = owner_config_from_js(options)?;
        let settings = WidgetSettings::default();
        let store = LocalSessionStore::new(settings.storage_key);

        let config = WidgetConfig::configure(input, settings, &store)?;
        let theme = theme_variables(&config.settings)?;

        ensure_stylesheet(ICON_STYLESHEET_MARKER, config.settings.icon_stylesheet)?;
        let root_id = create_container(WIDGET_ROOT_ID)?;

        let (commands, receiver) = unbounded();
        let context = WidgetContext::new(config.clone(), theme, receiver);
        let vdom = VirtualDom::new(ChatWidget).with_root_context(context.clone());
        let web_config = dioxus_web::Config::new().rootname(root_id.as_str());
        wasm_bindgen_futures::spawn_local(async move {
            dioxus_web::run(vdom, web_config).await;
        });

        info!("Chat widget mounted in #{root_id} for {}", config.chatbot_id);
        Ok(Self {
            config,
            store,
            context,
            commands,
        })
    }
}
