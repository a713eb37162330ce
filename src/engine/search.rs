//! Whole-tree search: match, prune, and highlight in one synchronous pass.

use std::ops::Range;

use super::{CatalogEngine, title_of};
use crate::model::BranchChildren;

/// Match counts of one `apply_search` invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSummary {
    pub matched_leaf_count: usize,
    pub matched_branch_count: usize,
}

impl CatalogEngine {
    /// Recompute match/visibility/highlight state tree-wide for `query`.
    ///
    /// The query is trimmed and lowercased. An empty query restores every
    /// node to visible and clears all highlight state while leaving branch
    /// open/closed flags and description expansion exactly as the user last
    /// set them. A non-empty query is always evaluated from the raw field
    /// values, so spans never compound across keystrokes:
    ///
    /// - a leaf matches iff its precomputed search text contains the query
    ///   as a plain case-insensitive substring; non-matching leaves are
    ///   hidden, matching leaves get highlight spans in title and
    ///   description, and a matched description is expanded so the
    ///   highlighted text is on screen;
    /// - a branch matches iff its own label contains the query; it is
    ///   highlighted and forced open;
    /// - visibility propagates children before parents: a branch is visible
    ///   iff its label matched or any direct child row is visible, and any
    ///   visible branch is forced open so the match is reachable with zero
    ///   extra clicks. Hidden branches keep their open flag untouched.
    pub fn apply_search(&mut self, query: &str) -> SearchSummary {
        let q = query.trim().to_lowercase();

        for state in &mut self.leaf_state {
            state.visible = true;
            state.matched = false;
            state.title_spans.clear();
            state.description_spans.clear();
            state.secondary_spans.clear();
        }
        for state in &mut self.branch_state {
            state.visible = true;
            state.matched = false;
            state.label_spans.clear();
        }
        self.query = q.clone();
        self.summary = SearchSummary::default();
        if q.is_empty() {
            return self.summary;
        }

        let mut matched_leaf_count = 0;
        for (leaf, state) in self.catalog.leaves.iter().zip(self.leaf_state.iter_mut()) {
            if !leaf.record.search_text.contains(q.as_str()) {
                state.visible = false;
                continue;
            }
            matched_leaf_count += 1;
            state.matched = true;
            state.title_spans = find_spans(title_of(&leaf.record, &self.options.strings), &q);
            if leaf.record.has_description() {
                state.description_spans = find_spans(&leaf.record.description, &q);
                state.expanded = true;
            }
            if self.options.highlight_secondary_url
                && leaf.record.navigates()
                && !leaf.record.name.is_empty()
            {
                state.secondary_spans = find_spans(&leaf.record.url, &q);
            }
        }

        // Branches are stored in pre-order, so a reverse scan evaluates every
        // child before its parent.
        let mut matched_branch_count = 0;
        for idx in (0..self.catalog.branches.len()).rev() {
            let branch = &self.catalog.branches[idx];
            let label_matched = branch.name.to_lowercase().contains(q.as_str());
            let any_child_visible = match &branch.children {
                BranchChildren::Leaves(ids) => {
                    ids.iter().any(|l| self.leaf_state[l.0].visible)
                }
                BranchChildren::Categories(ids) => {
                    ids.iter().any(|b| self.branch_state[b.0].visible)
                }
            };
            let state = &mut self.branch_state[idx];
            if label_matched {
                matched_branch_count += 1;
                state.matched = true;
                state.label_spans = find_spans(&branch.name, &q);
            }
            state.visible = label_matched || any_child_visible;
            if state.visible {
                state.open = true;
            }
        }

        self.summary = SearchSummary {
            matched_leaf_count,
            matched_branch_count,
        };
        self.summary
    }
}

/// Every non-overlapping left-to-right occurrence of `query_lower` in `text`,
/// compared case-insensitively, as byte ranges into `text`.
///
/// Matching walks the lowercased characters of `text` while keeping each
/// character's original byte range, so offsets stay correct even where
/// lowercasing changes a character's byte length.
pub fn find_spans(text: &str, query_lower: &str) -> Vec<Range<usize>> {
    let query: Vec<char> = query_lower.chars().collect();
    let mut spans = Vec::new();
    if query.is_empty() {
        return spans;
    }

    let mut lowered: Vec<char> = Vec::new();
    let mut origin: Vec<Range<usize>> = Vec::new();
    for (start, c) in text.char_indices() {
        let end = start + c.len_utf8();
        for lc in c.to_lowercase() {
            lowered.push(lc);
            origin.push(start..end);
        }
    }

    let mut i = 0;
    while i + query.len() <= lowered.len() {
        if lowered[i..i + query.len()] == query[..] {
            let start = origin[i].start;
            let end = origin[i + query.len() - 1].end;
            spans.push(start..end);
            i += query.len();
        } else {
            i += 1;
        }
    }
    spans
}
