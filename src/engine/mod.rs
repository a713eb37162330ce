//! Interactive catalog engine: one instance owns a loaded [`Catalog`] and all
//! of its derived mutable state.
//!
//! The tree and its flat indices are immutable after construction; the engine
//! only mutates per-branch open/closed state, per-leaf description expansion,
//! and the derived search state. A renderer reads the projection ([`Row`]s and
//! the per-node accessors) and relays user intents back through the operations
//! here; it never mutates state itself.
//!
//! Everything is strictly synchronous: each operation runs to completion on
//! the calling thread and fully determines the displayed result.

pub mod search;
pub mod text;

pub use search::SearchSummary;

use std::ops::Range;

use crate::model::{
    Branch, BranchChildren, BranchId, Catalog, DisplayVariant, Leaf, LeafId, LeafRecord,
};

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

/// Placeholder strings for leaves with missing fields.
#[derive(Debug, Clone)]
pub struct Strings {
    /// Title for a description-only leaf without a name.
    pub description_placeholder: String,
    /// Title for a leaf with no name, url, or description.
    pub empty_placeholder: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            description_placeholder: "(description)".to_string(),
            empty_placeholder: "(empty)".to_string(),
        }
    }
}

impl Strings {
    /// The placeholders of the original Polish catalog UI.
    pub fn polish() -> Self {
        Self {
            description_placeholder: "(opis)".to_string(),
            empty_placeholder: "(brak)".to_string(),
        }
    }
}

/// Engine policy flags. The three booleans capture points where observed
/// catalog UIs disagree; each is an explicit option instead of a silent pick.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Leaf-group branches start Open so a leaf list is visible without an
    /// extra click. Category branches always start Closed.
    pub leaf_groups_start_open: bool,
    /// Whether [`CatalogEngine::expand_all`] also expands every leaf
    /// description. Defaults to `true` ("expand all, including descriptions");
    /// set to `false` to open branches only.
    pub expand_all_expands_descriptions: bool,
    /// Whether search highlighting extends into the secondary raw-url label.
    /// Defaults to `false`: only titles and descriptions are highlighted.
    pub highlight_secondary_url: bool,
    pub strings: Strings,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            leaf_groups_start_open: true,
            expand_all_expands_descriptions: true,
            highlight_secondary_url: false,
            strings: Strings::default(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Mutable per-node state
// ────────────────────────────────────────────────────────────────────────────

/// Mutable state of one branch.
#[derive(Debug, Clone)]
pub struct BranchState {
    pub open: bool,
    /// False only while an active query prunes this branch.
    pub visible: bool,
    /// True while the branch's own label matches the active query.
    pub matched: bool,
    /// Highlight spans in the raw label, byte ranges, left to right.
    pub label_spans: Vec<Range<usize>>,
}

/// Mutable state of one leaf.
#[derive(Debug, Clone)]
pub struct LeafState {
    /// Description block Collapsed/Expanded.
    pub expanded: bool,
    pub visible: bool,
    pub matched: bool,
    pub title_spans: Vec<Range<usize>>,
    pub description_spans: Vec<Range<usize>>,
    pub secondary_spans: Vec<Range<usize>>,
}

/// Always-available catalog counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub category_count: usize,
    pub leaf_count: usize,
}

/// One row of the visible projection, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Branch { id: BranchId, depth: usize },
    Leaf { id: LeafId, depth: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// CatalogEngine
// ────────────────────────────────────────────────────────────────────────────

/// Owns a catalog and its open/search state for one browsing session.
pub struct CatalogEngine {
    catalog: Catalog,
    options: EngineOptions,
    branch_state: Vec<BranchState>,
    leaf_state: Vec<LeafState>,
    /// Normalized active query; empty when no search is active.
    query: String,
    summary: SearchSummary,
}

impl CatalogEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_options(catalog, EngineOptions::default())
    }

    pub fn with_options(catalog: Catalog, options: EngineOptions) -> Self {
        let branch_state = catalog
            .branches
            .iter()
            .map(|b| BranchState {
                open: match b.children {
                    BranchChildren::Leaves(_) => options.leaf_groups_start_open,
                    BranchChildren::Categories(_) => false,
                },
                visible: true,
                matched: false,
                label_spans: Vec::new(),
            })
            .collect();
        let leaf_state = catalog
            .leaves
            .iter()
            .map(|_| LeafState {
                expanded: false,
                visible: true,
                matched: false,
                title_spans: Vec::new(),
                description_spans: Vec::new(),
                secondary_spans: Vec::new(),
            })
            .collect();
        Self {
            catalog,
            options,
            branch_state,
            leaf_state,
            query: String::new(),
            summary: SearchSummary::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn branch_state(&self, id: BranchId) -> &BranchState {
        &self.branch_state[id.0]
    }

    pub fn leaf_state(&self, id: LeafId) -> &LeafState {
        &self.leaf_state[id.0]
    }

    /// The normalized active query, or `None` when no search is active.
    pub fn query(&self) -> Option<&str> {
        if self.query.is_empty() {
            None
        } else {
            Some(&self.query)
        }
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            category_count: self.catalog.category_count(),
            leaf_count: self.catalog.leaf_count(),
        }
    }

    /// Match counts of the active query, `None` when no search is active.
    pub fn search_summary(&self) -> Option<SearchSummary> {
        self.query().map(|_| self.summary)
    }

    // ── Branch open/closed state ────────────────────────────────────────────

    pub fn toggle_branch(&mut self, id: BranchId) {
        let state = &mut self.branch_state[id.0];
        state.open = !state.open;
    }

    pub fn open_branch(&mut self, id: BranchId) {
        self.branch_state[id.0].open = true;
    }

    pub fn close_branch(&mut self, id: BranchId) {
        self.branch_state[id.0].open = false;
    }

    /// Open every branch. Depending on
    /// [`EngineOptions::expand_all_expands_descriptions`], also expand every
    /// leaf description.
    pub fn expand_all(&mut self) {
        for state in &mut self.branch_state {
            state.open = true;
        }
        if self.options.expand_all_expands_descriptions {
            for (leaf, state) in self.catalog.leaves.iter().zip(&mut self.leaf_state) {
                if leaf.record.has_description() {
                    state.expanded = true;
                }
            }
        }
    }

    /// Close every branch and collapse every description.
    pub fn collapse_all(&mut self) {
        for state in &mut self.branch_state {
            state.open = false;
        }
        for state in &mut self.leaf_state {
            state.expanded = false;
        }
    }

    // ── Leaf description state ──────────────────────────────────────────────

    /// Flip one leaf's description block. No-op for variants without a
    /// description; never touches any other node.
    pub fn toggle_description(&mut self, id: LeafId) {
        if self.catalog.leaf(id).record.has_description() {
            let state = &mut self.leaf_state[id.0];
            state.expanded = !state.expanded;
        }
    }

    /// Expansion marker for the description toggle control, reflecting the
    /// current state; `None` for leaves without a description.
    pub fn marker(&self, id: LeafId) -> Option<&'static str> {
        if !self.catalog.leaf(id).record.has_description() {
            return None;
        }
        Some(if self.leaf_state[id.0].expanded {
            "[-]"
        } else {
            "[+]"
        })
    }

    // ── Display projection ──────────────────────────────────────────────────

    /// Title text for a leaf: name, else url, else a placeholder. Never empty.
    pub fn title_text(&self, id: LeafId) -> &str {
        title_of(&self.catalog.leaf(id).record, &self.options.strings)
    }

    /// Raw-url label shown next to a linked title that already displays the
    /// name.
    pub fn secondary_text(&self, id: LeafId) -> Option<&str> {
        let record = &self.catalog.leaf(id).record;
        if record.navigates() && !record.name.is_empty() {
            Some(record.url.as_str())
        } else {
            None
        }
    }

    /// Hover tooltip: the description of a linked leaf.
    pub fn tooltip_text(&self, id: LeafId) -> Option<&str> {
        let record = &self.catalog.leaf(id).record;
        match record.variant {
            DisplayVariant::LinkWithDescription => Some(record.description.as_str()),
            _ => None,
        }
    }

    /// Content of the expandable description block.
    pub fn block_text(&self, id: LeafId) -> Option<&str> {
        let record = &self.catalog.leaf(id).record;
        if record.has_description() {
            Some(record.description.as_str())
        } else {
            None
        }
    }

    /// Escaped title markup with the active query's matches wrapped in
    /// `<mark>` spans.
    pub fn title_markup(&self, id: LeafId) -> String {
        text::highlight_markup(self.title_text(id), &self.leaf_state[id.0].title_spans)
    }

    /// Escaped description markup with highlight spans; line breaks preserved.
    pub fn description_markup(&self, id: LeafId) -> Option<String> {
        self.block_text(id)
            .map(|t| text::highlight_markup(t, &self.leaf_state[id.0].description_spans))
    }

    /// Escaped secondary-url markup. Highlighted only when
    /// [`EngineOptions::highlight_secondary_url`] is set.
    pub fn secondary_markup(&self, id: LeafId) -> Option<String> {
        self.secondary_text(id)
            .map(|t| text::highlight_markup(t, &self.leaf_state[id.0].secondary_spans))
    }

    /// Escaped branch label markup with highlight spans.
    pub fn label_markup(&self, id: BranchId) -> String {
        text::highlight_markup(
            &self.catalog.branch(id).name,
            &self.branch_state[id.0].label_spans,
        )
    }

    /// The currently visible rows in display order. Children of a closed
    /// branch are not emitted; during an active search, pruned nodes are
    /// skipped.
    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for root in &self.catalog.roots {
            self.push_rows(*root, 0, &mut rows);
        }
        rows
    }

    fn push_rows(&self, id: BranchId, depth: usize, rows: &mut Vec<Row>) {
        let state = &self.branch_state[id.0];
        if !state.visible {
            return;
        }
        rows.push(Row::Branch { id, depth });
        if !state.open {
            return;
        }
        match &self.catalog.branch(id).children {
            BranchChildren::Categories(subs) => {
                for sub in subs {
                    self.push_rows(*sub, depth + 1, rows);
                }
            }
            BranchChildren::Leaves(leaf_ids) => {
                for leaf_id in leaf_ids {
                    if self.leaf_state[leaf_id.0].visible {
                        rows.push(Row::Leaf {
                            id: *leaf_id,
                            depth: depth + 1,
                        });
                    }
                }
            }
        }
    }
}

/// Displayed title of a record: name, else url, else a placeholder.
pub(crate) fn title_of<'a>(record: &'a LeafRecord, strings: &'a Strings) -> &'a str {
    if !record.name.is_empty() {
        return &record.name;
    }
    match record.variant {
        DisplayVariant::LinkOnly | DisplayVariant::LinkWithDescription => &record.url,
        DisplayVariant::DescriptionOnly => &strings.description_placeholder,
        DisplayVariant::PlainText => &strings.empty_placeholder,
    }
}

impl CatalogEngine {
    /// Branch plus its current state, for renderers.
    pub fn branch_ref(&self, id: BranchId) -> (&Branch, &BranchState) {
        (self.catalog.branch(id), &self.branch_state[id.0])
    }

    /// Leaf plus its current state, for renderers.
    pub fn leaf_ref(&self, id: LeafId) -> (&Leaf, &LeafState) {
        (self.catalog.leaf(id), &self.leaf_state[id.0])
    }
}
