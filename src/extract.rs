//! Visible-text extraction from raw HTML

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text never reaches the pipeline
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "svg",
];

/// Extract the readable text of an HTML document
///
/// Text is taken from `<body>` when there is one, otherwise from the whole
/// document. Scripts, styles and page chrome are skipped, and whitespace is
/// collapsed to single spaces.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut pieces = Vec::new();
    match body_selector().and_then(|selector| document.select(&selector).next()) {
        Some(body) => collect_text(body, &mut pieces),
        None => collect_text(document.root_element(), &mut pieces),
    }

    pieces
        .iter()
        .flat_map(|piece| piece.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The document's `<title>`, trimmed
pub fn extract_page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

fn body_selector() -> Option<Selector> {
    Selector::parse("body").ok()
}

fn collect_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    if SKIPPED_ELEMENTS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => pieces.push(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, pieces);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>  Garden Guide </title>
    <style>body { color: red; }</style>
  </head>
  <body>
    <nav>Home | About</nav>
    <h1>Growing Tomatoes</h1>
    <p>Tomatoes need   sun.
       Water them daily.</p>
    <script>console.log("tracking");</script>
    <footer>Copyright</footer>
  </body>
</html>"#;

    #[test]
    fn test_extract_text_skips_chrome_and_scripts() {
        assert_eq!(
            extract_text(PAGE),
            "Growing Tomatoes Tomatoes need sun. Water them daily."
        );
    }

    #[test]
    fn test_extract_page_title() {
        assert_eq!(extract_page_title(PAGE).as_deref(), Some("Garden Guide"));
        assert_eq!(extract_page_title("<p>no title</p>"), None);
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(extract_text("Just some words."), "Just some words.");
    }
}
