//! Structured search over the document index.
//!
//! A document is a candidate when it carries every requested tag and every
//! requested metadata value (all comparisons case-insensitive). A free-text
//! term is then looked up in frontmatter values, link targets and finally
//! the body, stopping at the first source that matches.

use std::collections::BTreeMap;

use super::links::LinkGraph;
use super::store::DocumentIndex;
use super::types::{Document, MatchSource, Query, SearchResult};

/// Characters of context kept on each side of a body match.
const SNIPPET_RADIUS: usize = 40;
const ELLIPSIS: &str = "...";

impl DocumentIndex {
    /// Run a query and return hits sorted by path.
    pub fn search(&self, query: &Query) -> Vec<SearchResult> {
        let term = query.term.trim();
        let mut hits: Vec<(&Document, MatchSource, String)> = self
            .filtered(query)
            .filter_map(|doc| {
                if term.is_empty() {
                    return Some((doc, MatchSource::Metadata, String::new()));
                }
                match_term(doc, term, self.config().enable_body)
                    .map(|(source, snippet)| (doc, source, snippet))
            })
            .collect();

        if hits.is_empty() {
            return Vec::new();
        }
        hits.sort_by(|a, b| a.0.path.cmp(&b.0.path));

        let graph = LinkGraph::build(self);
        hits.into_iter()
            .map(|(doc, match_from, snippet)| SearchResult {
                path: doc.path.clone(),
                snippet,
                match_from,
                score: 0.0,
                related: graph.related(&doc.path),
            })
            .collect()
    }

    /// Documents a query would return, without building results.
    pub fn matching(&self, query: &Query) -> Vec<&Document> {
        let term = query.term.trim();
        self.filtered(query)
            .filter(|doc| {
                term.is_empty() || match_term(doc, term, self.config().enable_body).is_some()
            })
            .collect()
    }

    fn filtered<'a, 'q>(
        &'a self,
        query: &'q Query,
    ) -> impl Iterator<Item = &'a Document> + use<'a, 'q> {
        self.documents().filter(|doc| {
            has_all_tags(&doc.tags, &query.tags)
                && satisfies_metadata(&doc.front_matter, &query.metadata)
        })
    }
}

/// Every wanted tag is present, ignoring case.
pub(crate) fn has_all_tags(tags: &[String], wanted: &[String]) -> bool {
    wanted.iter().all(|w| tags.iter().any(|t| t.to_lowercase() == w.to_lowercase()))
}

/// Every wanted key exists and holds every wanted value, ignoring case.
pub(crate) fn satisfies_metadata(
    fields: &BTreeMap<String, Vec<String>>,
    wanted: &BTreeMap<String, Vec<String>>,
) -> bool {
    wanted.iter().all(|(key, values)| {
        let key = key.to_lowercase();
        let Some((_, present)) = fields.iter().find(|(k, _)| k.to_lowercase() == key) else {
            return false;
        };
        values.iter().all(|v| {
            let v = v.to_lowercase();
            present.iter().any(|p| p.to_lowercase() == v)
        })
    })
}

fn match_term(doc: &Document, term: &str, enable_body: bool) -> Option<(MatchSource, String)> {
    let needle = term.to_lowercase();

    for (key, values) in &doc.front_matter {
        if let Some(value) = values.iter().find(|v| v.to_lowercase().contains(&needle)) {
            return Some((MatchSource::Frontmatter, format!("{key}: {value}")));
        }
    }

    if let Some(link) = doc.links.iter().find(|l| l.to_lowercase().contains(&needle)) {
        return Some((MatchSource::Links, link.clone()));
    }

    if enable_body {
        return body_snippet(&doc.body, term).map(|s| (MatchSource::Body, s));
    }

    None
}

/// Window of text around the first case-insensitive occurrence of `term`.
fn body_snippet(body: &str, term: &str) -> Option<String> {
    let chars: Vec<char> = body.chars().collect();
    let folded: Vec<char> = chars.iter().map(|c| fold(*c)).collect();
    let needle: Vec<char> = term.chars().map(fold).collect();
    if needle.is_empty() || needle.len() > folded.len() {
        return None;
    }

    let pos = folded.windows(needle.len()).position(|w| w == needle.as_slice())?;
    let start = pos.saturating_sub(SNIPPET_RADIUS);
    let end = (pos + needle.len() + SNIPPET_RADIUS).min(chars.len());

    let window: String = chars[start..end]
        .iter()
        .map(|c| if c.is_whitespace() { ' ' } else { *c })
        .collect();

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(window.trim());
    if end < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    Some(snippet)
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
