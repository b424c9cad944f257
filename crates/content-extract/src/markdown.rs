//! Text and Markdown extraction from the page's main content element
//! (`#content`, falling back to the whole body).

use chromiumoxide::Page;
use htmd::{Element, HtmlToMarkdown};
use tracing::debug;

use crate::errors::ExtractError;

const TEXT_JS: &str = r#"
(() => {
  const el = document.getElementById("content");
  return el ? el.innerText : document.body.innerText;
})()
"#;

const HTML_JS: &str = r#"
(() => {
  const el = document.getElementById("content");
  return el ? el.innerHTML : document.body.innerHTML;
})()
"#;

/// Rendered text of the main content element.
pub async fn get_text(page: &Page) -> Result<String, ExtractError> {
    let result = page.evaluate(TEXT_JS).await?;
    result
        .into_value()
        .map_err(|err| ExtractError::Eval(err.to_string()))
}

/// Main content element converted to Markdown.
pub async fn get_markdown(page: &Page) -> Result<String, ExtractError> {
    let result = page.evaluate(HTML_JS).await?;
    let html: String = result
        .into_value()
        .map_err(|err| ExtractError::Eval(err.to_string()))?;
    debug!(bytes = html.len(), "converting page html to markdown");
    html_to_markdown(&html)
}

/// HTML → Markdown: script/style stripped, `data:`-embedded images dropped
/// (they blow up the output), link and button text normalised into bracketed
/// Markdown link syntax.
pub fn html_to_markdown(html: &str) -> Result<String, ExtractError> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style"])
        .add_handler(vec!["img"], |element: Element| {
            let mut src = None;
            let mut alt = String::new();
            for attr in element.attrs {
                match &*attr.name.local {
                    "src" => src = Some(attr.value.to_string()),
                    "alt" => alt = attr.value.to_string(),
                    _ => {}
                }
            }
            match src {
                Some(src) if src.starts_with("data:") => Some(String::new()),
                Some(src) => Some(format!("![{alt}]({src})")),
                None => Some(String::new()),
            }
        })
        .add_handler(vec!["a"], |element: Element| {
            let cleaned = collapse_whitespace(element.content);
            let href = element.attrs.iter().find_map(|attr| {
                (&*attr.name.local == "href").then(|| attr.value.to_string())
            });
            match href {
                Some(href) if !href.is_empty() => Some(format!("[{cleaned}]({href})")),
                _ => Some(format!("[{cleaned}]")),
            }
        })
        .add_handler(vec!["button"], |element: Element| {
            Some(format!("[{}]", collapse_whitespace(element.content)))
        })
        .build();

    converter
        .convert(html)
        .map_err(|err| ExtractError::Markdown(err.to_string()))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_style() {
        let md = html_to_markdown("<p>hello</p><script>evil()</script><style>p{}</style>").unwrap();
        assert!(md.contains("hello"));
        assert!(!md.contains("evil"));
        assert!(!md.contains("p{}"));
    }

    #[test]
    fn drops_base64_images_but_keeps_real_ones() {
        let md = html_to_markdown(
            r#"<img src="data:image/png;base64,AAAA" alt="x"><img src="/logo.png" alt="logo">"#,
        )
        .unwrap();
        assert!(!md.contains("base64"));
        assert!(md.contains("![logo](/logo.png)"));
    }

    #[test]
    fn links_and_buttons_become_bracketed() {
        let md = html_to_markdown(
            r#"<a href="/next">  Next   page </a><button>Submit</button><a>bare</a>"#,
        )
        .unwrap();
        assert!(md.contains("[Next page](/next)"));
        assert!(md.contains("[Submit]"));
        assert!(md.contains("[bare]"));
    }

    #[test]
    fn collapse_whitespace_normalises_runs() {
        assert_eq!(collapse_whitespace("  a \n b\tc "), "a b c");
    }
}
