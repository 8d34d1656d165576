// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML title and snippet extraction
//!
//! Pure functions over fetched markup. Malformed input never fails; it just
//! yields empty strings.

use scraper::{ElementRef, Html, Selector};

use crate::search::types::PageSummary;

/// Elements whose text never contributes to a snippet
const NOISE_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

const MAX_TITLE_CHARS: usize = 200;
const MAX_SNIPPET_WORDS: usize = 80;
const MAX_SNIPPET_CHARS: usize = 500;
const MAX_SNIPPET_PARTS: usize = 5;
const MIN_PART_CHARS: usize = 20;

/// Extract a title and a summary snippet from page markup
pub fn extract_summary(markup: &[u8]) -> PageSummary {
    let html = String::from_utf8_lossy(markup);
    let document = Html::parse_document(&html);

    PageSummary {
        title: extract_title(&document),
        snippet: extract_snippet(&document),
    }
}

/// First `<title>`, falling back to the first `<h1>`
fn extract_title(document: &Html) -> String {
    let title = first_text(document, "title");
    let title = if title.is_empty() {
        first_text(document, "h1")
    } else {
        title
    };
    truncate_chars(&title, MAX_TITLE_CHARS)
}

fn first_text(document: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Meta description if present, otherwise the first few substantial text blocks
fn extract_snippet(document: &Html) -> String {
    let mut parts = meta_descriptions(document);

    if parts.is_empty() {
        if let Ok(selector) = Selector::parse("p, div, span") {
            for element in document.select(&selector) {
                if parts.len() >= MAX_SNIPPET_PARTS {
                    break;
                }
                if inside_noise(&element) {
                    continue;
                }
                let mut text = String::new();
                visible_text(element, &mut text);
                let text = text.trim();
                if text.chars().count() > MIN_PART_CHARS {
                    parts.push(text.to_string());
                }
            }
        }
    }

    let words: Vec<&str> = parts
        .iter()
        .flat_map(|p| p.split_whitespace())
        .take(MAX_SNIPPET_WORDS)
        .collect();

    truncate_chars(&words.join(" "), MAX_SNIPPET_CHARS)
}

fn meta_descriptions(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("meta[name='description']") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_noise(element: &ElementRef) -> bool {
    NOISE_TAGS.contains(&element.value().name())
}

fn inside_noise(element: &ElementRef) -> bool {
    is_noise(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_noise(&ancestor))
}

/// Text of `element`, skipping noise subtrees
fn visible_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !is_noise(&child_element) {
                visible_text(child_element, out);
            }
        }
    }
}

/// Truncate to `max_chars` characters, marking the cut with "..."
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
