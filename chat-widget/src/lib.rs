pub mod api;
pub mod components;
pub mod interop;
pub mod storage;
pub mod styles;
pub mod widget;

pub use api::*;
pub use components::*;
pub use storage::*;
pub use widget::*;
