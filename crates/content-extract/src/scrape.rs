//! The most-direct-children scrape heuristic.
//!
//! In-page: the element with the greatest direct-child count is taken as the
//! main repeating container; each of its children is flattened into an
//! ordered label→text mapping (label = class attribute, joined class list, or
//! lowercased tag name), textual content assembled from direct text nodes and
//! `<em>` children only. Sibling label collisions get " 2", " 3" suffixes in
//! encounter order. Filter application happens on this side of the boundary.

use std::collections::HashSet;

use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ExtractError;

/// One extracted item: ordered mapping of labels to text fragments.
pub type ScrapeItem = Map<String, Value>;

const EXTRACT_JS: &str = r#"
(() => {
  const body = document.body;
  if (!body) return [];

  let maxEl = null;
  let maxCount = -1;
  for (const el of body.querySelectorAll("*")) {
    if (!(el instanceof HTMLElement)) {
      continue;
    }
    const count = el.children.length;
    if (count > maxCount) {
      maxCount = count;
      maxEl = el;
    }
  }

  if (!maxEl) return [];

  const extract = (el) => {
    const className = (() => {
      if (typeof el.className === "string") {
        const trimmed = el.className.trim();
        if (trimmed) return trimmed;
      }
      if (el.classList?.length) {
        return Array.from(el.classList).join(" ");
      }
      return el.tagName?.toLowerCase() || "no-class";
    })();
    const text = Array.from(el.childNodes)
      .map((node) => {
        if (node.nodeType === Node.TEXT_NODE) {
          return (node.textContent || "").trim();
        }
        if (
          node.nodeType === Node.ELEMENT_NODE &&
          typeof node.nodeName === "string" &&
          node.nodeName.toLowerCase() === "em"
        ) {
          return (node.textContent || "").trim();
        }
        return "";
      })
      .filter(Boolean)
      .join("");
    let result = {};
    if (text) {
      result[className] = text;
    }
    Array.from(el.children).forEach((child) => {
      const childResult = extract(child);
      Object.entries(childResult).forEach(([key, value]) => {
        let newKey = key;
        let count = 2;
        while (Object.prototype.hasOwnProperty.call(result, newKey)) {
          newKey = `${key} ${count}`;
          count += 1;
        }
        result[newKey] = value;
      });
    });

    return result;
  };

  return Array.from(maxEl.children)
    .map(extract)
    .filter((item) => Object.keys(item).length > 0);
})()
"#;

/// Run the heuristic inside the page and apply `filters` to the result.
pub async fn scrape(
    page: &Page,
    filters: Option<&[String]>,
) -> Result<Vec<ScrapeItem>, ExtractError> {
    let params = EvaluateParams::builder()
        .expression(EXTRACT_JS)
        .return_by_value(true)
        .build()
        .map_err(ExtractError::Eval)?;
    let result = page.evaluate(params).await?;
    let items: Vec<ScrapeItem> = result
        .into_value()
        .map_err(|err| ExtractError::Eval(err.to_string()))?;
    debug!(items = items.len(), "scraped container children");
    Ok(apply_filters(items, filters))
}

/// Retain only the filter labels per item; items left with no keys at all are
/// dropped entirely. `None` keeps everything.
pub fn apply_filters(items: Vec<ScrapeItem>, filters: Option<&[String]>) -> Vec<ScrapeItem> {
    let Some(filters) = filters else {
        return items;
    };
    if filters.is_empty() {
        return items;
    }
    let keep: HashSet<&str> = filters.iter().map(String::as_str).collect();

    items
        .into_iter()
        .map(|item| {
            item.into_iter()
                .filter(|(key, _)| keep.contains(key.as_str()))
                .collect::<ScrapeItem>()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(pairs: &[(&str, &str)]) -> ScrapeItem {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn no_filters_keeps_everything() {
        let items = vec![item(&[("title", "a")]), item(&[("price", "1")])];
        assert_eq!(apply_filters(items.clone(), None).len(), 2);
        assert_eq!(apply_filters(items, Some(&[])).len(), 2);
    }

    #[test]
    fn filters_retain_only_named_labels() {
        let items = vec![item(&[("title", "a"), ("price", "1"), ("junk", "x")])];
        let filters = vec!["title".to_string(), "price".to_string()];
        let filtered = apply_filters(items, Some(&filters));
        assert_eq!(filtered.len(), 1);
        let keys: Vec<&str> = filtered[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "price"]);
    }

    #[test]
    fn items_with_no_retained_keys_are_dropped() {
        let items = vec![item(&[("title", "a")]), item(&[("junk", "x")])];
        let filters = vec!["title".to_string()];
        let filtered = apply_filters(items, Some(&filters));
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn absent_labels_drop_every_item() {
        let items = vec![item(&[("title", "a")]), item(&[("price", "1")])];
        let filters = vec!["nope".to_string()];
        assert!(apply_filters(items, Some(&filters)).is_empty());
    }
}
