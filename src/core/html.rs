// src/core/html.rs
//! Thin helpers over `scraper` for the table-shaped fragments the portal serves.
//!
//! Everything walks *direct children* (`table > tbody > tr > td`) so a nested
//! table inside a cell can never leak rows or cells into the outer one.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::sanitize::normalize_ws;
use crate::config::consts::BASE_ORIGIN;

macro_rules! selector {
    ($name:ident, $css:literal) => {
        pub static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect(concat!("valid selector: ", $css)));
    };
}

selector!(TABLE, "table");
selector!(RANKING_TABLE, "table.table");
selector!(LABEL_SPAN, "span.ellipsis");
selector!(SPAN, "span");
selector!(IMG, "img[src]");
selector!(LINK, "a[href]");
selector!(THEAD_TH, "thead th");
selector!(TR, "tr");

pub fn parse(markup: &str) -> Html {
    Html::parse_fragment(markup)
}

/// Direct element children with the given tag name.
pub fn children<'a>(el: ElementRef<'a>, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |c| c.value().name().eq_ignore_ascii_case(tag))
}

/// `<tr>` rows of the table body. Missing `<tbody>` → no rows.
pub fn body_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    children(table, "tbody")
        .next()
        .map(|tbody| children(tbody, "tr").collect())
        .unwrap_or_default()
}

pub fn cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    children(row, "td").collect()
}

/// Visible text, whitespace collapsed. Text nodes are joined with a space so
/// `<a>Ver</a><span>Joan</span>` reads as "Ver Joan", not "VerJoan".
pub fn text_of(el: ElementRef<'_>) -> String {
    let joined = el
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_ws(&joined)
}

/// Trimmed attribute value; empty values count as absent.
pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name).map(str::trim).filter(|v| !v.is_empty())
}

pub fn first<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    el.select(sel).next()
}

pub fn has(el: ElementRef<'_>, sel: &Selector) -> bool {
    first(el, sel).is_some()
}

/// Resolve a portal href/src against the fixed origin.
pub fn absolutize(href: &str) -> String {
    let href = href.trim();
    let lc = href.to_ascii_lowercase();
    if lc.starts_with("http://") || lc.starts_with("https://") {
        s!(href)
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("{BASE_ORIGIN}{href}")
    } else {
        format!("{BASE_ORIGIN}/{href}")
    }
}
