use dioxus::prelude::MountedEvent;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))
}

/// Add `<link rel="stylesheet">` to the head unless a link whose href
/// contains `fragment` is already on the page.
pub fn ensure_stylesheet(fragment: &str, href: &str) -> Result<(), JsValue> {
    let document = document()?;
    let selector = format!("link[href*=\"{fragment}\"]");
    if document.query_selector(&selector)?.is_some() {
        return Ok(());
    }

    let link = document.create_element("link")?;
    link.set_attribute("rel", "stylesheet")?;
    link.set_attribute("href", href)?;

    if let Some(head) = document.head() {
        head.append_child(&link)?;
    } else if let Some(body) = document.body() {
        body.append_child(&link)?;
    }

    Ok(())
}

/// Append an empty container to the body and return its id. The first widget
/// gets `base_id`, later ones a numeric suffix.
pub fn create_container(base_id: &str) -> Result<String, JsValue> {
    let document = document()?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let id = (1..)
        .map(|n| match n {
            1 => base_id.to_string(),
            n => format!("{base_id}-{n}"),
        })
        .find(|id| document.get_element_by_id(id).is_none())
        .unwrap_or_else(|| base_id.to_string());

    let container = document.create_element("div")?;
    container.set_id(&id);
    body.append_child(&container)?;
    Ok(id)
}

/// The DOM node behind a Dioxus `onmounted` event
pub fn mounted_element(event: &MountedEvent) -> Option<Element> {
    event.data().downcast::<Element>().cloned()
}

pub fn clamp_input_height(scroll_height: i32, max_height: i32) -> i32 {
    scroll_height.clamp(0, max_height)
}

/// Grow the textarea to fit its content, up to `max_height` pixels.
pub fn resize_input_to_content(input: &Element, max_height: i32) {
    let Some(html) = input.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = html.style();
    let _ = style.set_property("height", "auto");
    let height = clamp_input_height(input.scroll_height(), max_height);
    let _ = style.set_property("height", &format!("{height}px"));
}

pub fn reset_input_height(input: &Element) {
    if let Some(html) = input.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property("height", "auto");
    }
}

pub fn focus_element(element: &Element) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html.focus();
    }
}

pub fn scroll_to_bottom(element: &Element) {
    element.set_scroll_top(element.scroll_height());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_height_is_clamped() {
        assert_eq!(clamp_input_height(42, 100), 42);
        assert_eq!(clamp_input_height(100, 100), 100);
        assert_eq!(clamp_input_height(260, 100), 100);
        assert_eq!(clamp_input_height(-1, 100), 0);
    }
}
