//! The in-page classifier, shipped as a self-contained function so it crosses
//! the evaluation boundary with no captured scope: JSON arguments in, JSON
//! result out.
//!
//! Selection predicate: interactable tags (button, a, non-hidden input,
//! textarea, select, label), ARIA roles textbox/button/checkbox/radio, or an
//! inline click handler, with a rendered area of at least 20 px². Elements
//! whose computed label is empty are dropped, and when one qualifying element
//! contains another only the innermost survives.

/// `(args) => ...` where `args` is `{"op": "scrollIntoView"|"classify",
/// "text": string}`. `scrollIntoView` returns a bool (match found, scrolled
/// into view if offscreen); `classify` returns the candidate list.
pub const CLASSIFIER_JS: &str = r#"
(args) => {
  function controlLabel(el) {
    const labelledBy = el.getAttribute("aria-labelledby");
    if (labelledBy) {
      const labelEl = document.getElementById(labelledBy);
      if (labelEl) return labelEl.innerText;
    }

    if (el.id) {
      try {
        const labelEl = document.querySelector(`label[for="${CSS.escape(el.id)}"]`);
        if (labelEl) return labelEl.innerText;
      } catch (e) {}
    }

    const parentLabel = el.closest("label");
    if (parentLabel) return parentLabel.innerText;

    return null;
  }

  function elementText(el) {
    let label =
      el.getAttribute("aria-label") ||
      el.getAttribute("title") ||
      el.getAttribute("placeholder");

    if (
      (!label || !label.trim()) &&
      (el.tagName === "INPUT" || el.tagName === "TEXTAREA" || el.tagName === "SELECT")
    ) {
      label = controlLabel(el);
    }

    if (!label) label = el.innerText || el.textContent || el.value;

    return label ? String(label).replace(/\s+/g, " ").trim() : "";
  }

  function classify() {
    let elements = Array.prototype.slice
      .call(document.querySelectorAll("*"))
      .filter((el) => {
        if (
          el.tagName === "BUTTON" ||
          el.tagName === "A" ||
          (el.tagName === "INPUT" && el.type !== "hidden") ||
          el.tagName === "TEXTAREA" ||
          el.tagName === "SELECT" ||
          el.tagName === "LABEL" ||
          el.getAttribute("role") === "textbox" ||
          el.getAttribute("role") === "button" ||
          el.getAttribute("role") === "checkbox" ||
          el.getAttribute("role") === "radio" ||
          el.onclick != null
        ) {
          const rect = el.getBoundingClientRect();
          return (rect.right - rect.left) * (rect.bottom - rect.top) >= 20;
        }
        return false;
      })
      .map((el) => {
        const rect = el.getBoundingClientRect();
        return {
          el,
          rect: {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
          },
          text: elementText(el),
        };
      })
      .filter((x) => Boolean(x.text));

    // If one element contains another, keep only the contained one.
    elements = elements.filter(
      (x) => !elements.some((y) => x.el.contains(y.el) && x !== y)
    );
    return elements;
  }

  const elements = classify();

  if (args.op === "scrollIntoView") {
    const target =
      elements.find(({ text }) => text === args.text) ||
      elements.find(({ text }) => text.includes(args.text)) ||
      null;

    if (!target) return false;

    const rect = target.el.getBoundingClientRect();
    const outsideView =
      rect.top < 0 ||
      rect.bottom > window.innerHeight ||
      rect.left < 0 ||
      rect.right > window.innerWidth;

    if (outsideView) {
      target.el.scrollIntoView({ block: "center", inline: "center" });
    }

    return true;
  }

  return elements.map(({ rect, text }) => ({ rect, text }));
}
"#;

/// Wrap the classifier into a single expression invoking it with `args`.
pub fn classifier_expression(args: &serde_json::Value) -> String {
    format!("({})({})", CLASSIFIER_JS.trim(), args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expression_inlines_arguments() {
        let expr = classifier_expression(&json!({ "op": "scrollIntoView", "text": "OK" }));
        assert!(expr.starts_with("((args) =>"));
        assert!(expr.ends_with(r#"({"op":"scrollIntoView","text":"OK"})"#));
    }

    #[test]
    fn arguments_are_json_escaped() {
        let expr = classifier_expression(&json!({ "op": "classify", "text": "say \"hi\"" }));
        assert!(expr.contains(r#"say \"hi\""#));
    }
}
