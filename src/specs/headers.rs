// src/specs/headers.rs
//! Column-label resolution.
//!
//! The portal hides the long label of a stat column in different places
//! depending on the page version: a `title` tooltip on the `<th>`, a `title`
//! on a nested `<span>`, the span's text, the bare cell text, or a Bootstrap
//! `data-original-title`. Candidates are collected in markup order, then picked
//! by [`LABEL_PRIORITY`].

use scraper::ElementRef;

use crate::core::html::{attr, first, text_of, SPAN};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelSource {
    CellTitle,
    SpanTitle,
    SpanText,
    CellText,
    OriginalTitle,
}

pub const LABEL_PRIORITY: [LabelSource; 5] = [
    LabelSource::CellTitle,
    LabelSource::SpanTitle,
    LabelSource::SpanText,
    LabelSource::CellText,
    LabelSource::OriginalTitle,
];

/// Non-empty candidates in discovery order: cell attributes first, then the
/// nested span, then the cell's text.
pub fn candidates(cell: ElementRef<'_>) -> Vec<(LabelSource, String)> {
    let mut out = Vec::with_capacity(5);

    if let Some(t) = attr(cell, "title") {
        out.push((LabelSource::CellTitle, s!(t)));
    }
    if let Some(t) = attr(cell, "data-original-title") {
        out.push((LabelSource::OriginalTitle, s!(t)));
    }
    if let Some(span) = first(cell, &SPAN) {
        if let Some(t) = attr(span, "title") {
            out.push((LabelSource::SpanTitle, s!(t)));
        }
        let t = text_of(span);
        if !t.is_empty() {
            out.push((LabelSource::SpanText, t));
        }
    }
    let t = text_of(cell);
    if !t.is_empty() {
        out.push((LabelSource::CellText, t));
    }
    out
}

/// Pick by priority; fall back to the first discovered candidate; else "".
pub fn pick(candidates: &[(LabelSource, String)], priority: &[LabelSource]) -> String {
    priority
        .iter()
        .find_map(|want| {
            candidates
                .iter()
                .find(|(source, text)| source == want && !text.is_empty())
        })
        .or_else(|| candidates.first())
        .map(|(_, text)| text.clone())
        .unwrap_or_default()
}

pub fn resolve_label(cell: ElementRef<'_>) -> String {
    pick(&candidates(cell), &LABEL_PRIORITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::html::{parse, THEAD_TH};

    fn labels(markup: &str) -> Vec<String> {
        let doc = parse(markup);
        doc.select(&THEAD_TH).map(resolve_label).collect()
    }

    #[test]
    fn cell_title_beats_everything() {
        let l = labels(r#"<table><thead><tr>
            <th title="Partidos jugados" data-original-title="X"><span title="Y">PJ</span></th>
        </tr></thead></table>"#);
        assert_eq!(l, vec!["Partidos jugados"]);
    }

    #[test]
    fn span_text_beats_earlier_discovered_original_title() {
        // data-original-title is discovered first but ranks last.
        let l = labels(r#"<table><thead><tr>
            <th data-original-title="Goles totales"><span>GT</span></th>
        </tr></thead></table>"#);
        assert_eq!(l, vec!["GT"]);
    }

    #[test]
    fn span_title_beats_span_text() {
        let l = labels(r#"<table><thead><tr>
            <th><span title="Tarjetas amarillas">TA</span></th>
        </tr></thead></table>"#);
        assert_eq!(l, vec!["Tarjetas amarillas"]);
    }

    #[test]
    fn plain_and_empty_cells() {
        let l = labels(r#"<table><thead><tr><th> Nombre </th><th></th></tr></thead></table>"#);
        assert_eq!(l, vec![s!("Nombre"), s!()]);
    }

    #[test]
    fn falls_back_to_first_discovered_outside_priority() {
        let cands = vec![
            (LabelSource::OriginalTitle, s!("late")),
            (LabelSource::CellText, s!("text")),
        ];
        assert_eq!(pick(&cands, &[LabelSource::CellTitle]), "late");
        assert_eq!(pick(&cands, &[LabelSource::CellText]), "text");
        assert_eq!(pick(&[], &LABEL_PRIORITY), "");
    }
}
