//! The action primitives themselves. Each takes the already-resolved page;
//! session acquisition and release happen around them.

use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventParamsBuilder, DispatchKeyEventType,
    DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use tokio::time::sleep;
use tracing::{debug, info};

use cdp_session::config::INPUT_SETTLE;
use element_locator::{resolve_target, Candidate, ClassifierPort, PageClassifier};

use crate::errors::ActionError;
use crate::keys::{key_definition, key_text, modifier_bit, parse_key_combo, MODIFIER_SHIFT};

/// Click the element whose accessible label matches `text`, polling until it
/// appears. The click is dispatched at the centre of the element's fresh
/// bounding rectangle.
pub async fn click(page: &Page, text: &str) -> Result<(), ActionError> {
    let classifier = PageClassifier::new(page.clone());

    // Waits (and scrolls) until a match exists, then re-reads geometry: the
    // layout may have shifted while scrolling the target into view.
    let target = resolve_target(&classifier, text).await?;

    let (x, y) = target.rect.center();
    info!(text, x, y, "clicking element");
    dispatch_click(page, x, y).await?;
    Ok(())
}

async fn dispatch_click(page: &Page, x: f64, y: f64) -> Result<(), ActionError> {
    page.execute(
        DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseMoved)
            .x(x)
            .y(y)
            .build()
            .map_err(ActionError::Input)?,
    )
    .await?;

    page.execute(
        DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MousePressed)
            .x(x)
            .y(y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(ActionError::Input)?,
    )
    .await?;

    page.execute(
        DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseReleased)
            .x(x)
            .y(y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(ActionError::Input)?,
    )
    .await?;

    Ok(())
}

/// Type `text` into whichever element currently has focus. No target
/// resolution happens here; focus the right element first (e.g. via `click`).
pub async fn type_text(page: &Page, text: &str) -> Result<(), ActionError> {
    info!(chars = text.chars().count(), "typing into focused element");
    for ch in text.chars() {
        page.execute(
            DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::Char)
                .text(ch.to_string())
                .build()
                .map_err(ActionError::Input)?,
        )
        .await?;
    }
    sleep(INPUT_SETTLE).await;
    Ok(())
}

/// Press a `+`-separated key combination: all keys down left-to-right, then
/// released in reverse order so modifiers let go last.
pub async fn press_key(page: &Page, combo: &str) -> Result<(), ActionError> {
    let keys = parse_key_combo(combo);
    info!(combo, ?keys, "pressing key combination");

    for event in combo_events(&keys)? {
        page.execute(event).await?;
    }

    sleep(INPUT_SETTLE).await;
    Ok(())
}

/// The full key-down/key-up sequence for a combo. A key-down carries its
/// character payload only while no modifier other than Shift is held;
/// otherwise `ctrl+a` would insert the letter on top of triggering the
/// shortcut.
fn combo_events(keys: &[String]) -> Result<Vec<DispatchKeyEventParams>, ActionError> {
    let mut events = Vec::with_capacity(keys.len() * 2);

    let mut modifiers = 0i64;
    for key in keys {
        let mut builder = key_event(DispatchKeyEventType::KeyDown, key, modifiers);
        if modifiers & !MODIFIER_SHIFT == 0 {
            if let Some(text) = key_text(key) {
                builder = builder.text(text);
            }
        }
        events.push(builder.build().map_err(ActionError::Input)?);
        modifiers |= modifier_bit(key);
    }

    for key in keys.iter().rev() {
        modifiers &= !modifier_bit(key);
        events.push(
            key_event(DispatchKeyEventType::KeyUp, key, modifiers)
                .build()
                .map_err(ActionError::Input)?,
        );
    }

    Ok(events)
}

fn key_event(kind: DispatchKeyEventType, key: &str, modifiers: i64) -> DispatchKeyEventParamsBuilder {
    let mut builder = DispatchKeyEventParams::builder()
        .r#type(kind)
        .key(key.to_string())
        .modifiers(modifiers);

    let definition = key_definition(key);
    if let Some(code) = definition.code {
        builder = builder.code(code);
    }
    if let Some(vk) = definition.virtual_key_code {
        builder = builder
            .windows_virtual_key_code(vk)
            .native_virtual_key_code(vk);
    }
    builder
}

/// Auto-scroll the page until `scrollY` stops growing for two seconds.
pub async fn scroll_to_bottom(page: &Page) -> Result<(), ActionError> {
    const SCROLL_JS: &str = r#"
new Promise((resolve) => {
  const scrollDistance = 200;
  const scrollInterval = 100;
  const scrollTimeout = 2000;

  let lastScrollY = 0;
  let lastChange = Date.now();
  const timer = setInterval(() => {
    window.scrollBy(0, scrollDistance);

    if (window.scrollY > lastScrollY) {
      lastScrollY = window.scrollY;
      lastChange = Date.now();
    }

    if (Date.now() - lastChange >= scrollTimeout) {
      clearInterval(timer);
      resolve(true);
    }
  }, scrollInterval);
})
"#;

    debug!("auto-scrolling to bottom");
    let params = EvaluateParams::builder()
        .expression(SCROLL_JS)
        .await_promise(true)
        .return_by_value(true)
        .build()
        .map_err(ActionError::Input)?;
    page.evaluate(params).await?;
    Ok(())
}

/// All currently classified interactable elements, for debugging.
pub async fn dump(page: &Page) -> Result<Vec<Candidate>, ActionError> {
    let classifier = PageClassifier::new(page.clone());
    Ok(classifier.classify().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::MODIFIER_CTRL;

    #[test]
    fn modified_key_down_carries_no_text() {
        let events = combo_events(&parse_key_combo("ctrl+a")).unwrap();
        assert_eq!(events.len(), 4);

        let control_down = &events[0];
        assert_eq!(control_down.key.as_deref(), Some("Control"));
        assert_eq!(control_down.modifiers, Some(0));
        assert_eq!(control_down.text, None);

        // The letter fires as a shortcut here, not as typed input.
        let a_down = &events[1];
        assert_eq!(a_down.key.as_deref(), Some("a"));
        assert_eq!(a_down.modifiers, Some(MODIFIER_CTRL));
        assert_eq!(a_down.text, None);
    }

    #[test]
    fn bare_key_down_still_types_its_character() {
        let events = combo_events(&parse_key_combo("a")).unwrap();
        assert_eq!(events[0].text.as_deref(), Some("a"));

        let events = combo_events(&parse_key_combo("enter")).unwrap();
        assert_eq!(events[0].text.as_deref(), Some("\r"));
    }

    #[test]
    fn shift_alone_does_not_suppress_text() {
        let events = combo_events(&parse_key_combo("shift+a")).unwrap();
        assert_eq!(events[1].text.as_deref(), Some("a"));
    }

    #[test]
    fn releases_in_reverse_order_clearing_modifiers() {
        let events = combo_events(&parse_key_combo("ctrl+shift+a")).unwrap();
        assert_eq!(events.len(), 6);

        let ups = &events[3..];
        assert_eq!(ups[0].key.as_deref(), Some("a"));
        assert_eq!(ups[1].key.as_deref(), Some("Shift"));
        assert_eq!(ups[2].key.as_deref(), Some("Control"));
        assert_eq!(ups[2].modifiers, Some(0));
    }

    #[test]
    fn events_carry_physical_key_codes() {
        let events = combo_events(&parse_key_combo("ctrl+c")).unwrap();
        assert_eq!(events[0].code.as_deref(), Some("ControlLeft"));
        assert_eq!(events[0].windows_virtual_key_code, Some(17));
        assert_eq!(events[1].code.as_deref(), Some("KeyC"));
        assert_eq!(events[1].windows_virtual_key_code, Some(67));
    }
}
