use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// CatalogDoc – binary serialization wrapper
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDoc {
    pub catalog: Catalog,
}

impl CatalogDoc {
    /// Save the CatalogDoc to a binary file with magic bytes and versioning.
    pub fn save_to_binary<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        std::io::Write::write_all(&mut writer, b"LINKGROVE")?;
        std::io::Write::write_all(&mut writer, &1u32.to_le_bytes())?;
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        Ok(())
    }

    /// Load a CatalogDoc from a binary file, checking magic bytes and version.
    pub fn load_from_binary<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut reader = std::io::BufReader::new(file);
        let mut magic = [0u8; 9];
        std::io::Read::read_exact(&mut reader, &mut magic)?;
        if &magic != b"LINKGROVE" {
            anyhow::bail!("Invalid magic bytes: expected 'LINKGROVE'");
        }
        let mut version_bytes = [0u8; 4];
        std::io::Read::read_exact(&mut reader, &mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != 1 {
            anyhow::bail!("Unsupported version: {}", version);
        }
        let doc: CatalogDoc =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
        Ok(doc)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ids
// ────────────────────────────────────────────────────────────────────────────

/// Index of a branch in [`Catalog::branches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchId(pub usize);

/// Index of a leaf in [`Catalog::leaves`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeafId(pub usize);

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

/// An immutable catalog tree plus flat branch/leaf indices.
///
/// Branches are stored in pre-order: a parent's index is always smaller than
/// the index of any of its descendants. Bulk operations (expand-all, search)
/// iterate the flat vectors instead of re-walking the tree, and the search
/// visibility pass scans `branches` in reverse to evaluate children before
/// their parents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Top-level categories in display order.
    pub roots: Vec<BranchId>,
    /// Every branch (categories and leaf groups), pre-order.
    pub branches: Vec<Branch>,
    /// Every leaf record, group runs in source order.
    pub leaves: Vec<Leaf>,
}

/// A named tree node: either a category with sub-branches or a leaf group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub parent: Option<BranchId>,
    pub children: BranchChildren,
}

/// Children of a branch.
///
/// Category children are sorted ascending by lowercased key at build time and
/// never resorted. Leaf lists preserve the exact source sequence order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BranchChildren {
    Categories(Vec<BranchId>),
    Leaves(Vec<LeafId>),
}

/// A terminal catalog entry together with the leaf group that owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    pub group: BranchId,
    pub record: LeafRecord,
}

// ────────────────────────────────────────────────────────────────────────────
// LeafRecord
// ────────────────────────────────────────────────────────────────────────────

/// How a leaf is presented, fixed at build time from field presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayVariant {
    /// `url` set, no description: the title is a hyperlink.
    LinkOnly,
    /// `url` and `description` set: hyperlink title with tooltip and an
    /// expandable inline description block.
    LinkWithDescription,
    /// No `url`, `description` set: the title itself toggles the block.
    DescriptionOnly,
    /// Neither `url` nor `description`: inert text.
    PlainText,
}

/// A normalized leaf record.
///
/// `name` and `url` are trimmed; `description` is trimmed at the ends only,
/// so embedded line breaks survive. Missing or non-string fields collapse to
/// the empty string. `search_text` and `variant` are derived once at build
/// time and never change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafRecord {
    pub name: String,
    pub url: String,
    pub description: String,
    /// Unrecognized scalar fields of the source record, in document order.
    /// Preserved for JSON round-trips; never searched.
    #[serde(default)]
    pub extra: IndexMap<String, String>,
    /// Lowercased `name + " " + url + " " + description`.
    pub search_text: String,
    pub variant: DisplayVariant,
}

impl LeafRecord {
    /// Build a record from already-coerced field strings, deriving the
    /// search text and display variant.
    pub fn new(name: String, url: String, description: String) -> Self {
        Self::with_extra(name, url, description, IndexMap::new())
    }

    pub fn with_extra(
        name: String,
        url: String,
        description: String,
        extra: IndexMap<String, String>,
    ) -> Self {
        let search_text = format!("{} {} {}", name, url, description).to_lowercase();
        let variant = match (!url.is_empty(), !description.is_empty()) {
            (true, true) => DisplayVariant::LinkWithDescription,
            (true, false) => DisplayVariant::LinkOnly,
            (false, true) => DisplayVariant::DescriptionOnly,
            (false, false) => DisplayVariant::PlainText,
        };
        Self {
            name,
            url,
            description,
            extra,
            search_text,
            variant,
        }
    }

    /// True for the variants that carry an expandable description block.
    pub fn has_description(&self) -> bool {
        matches!(
            self.variant,
            DisplayVariant::LinkWithDescription | DisplayVariant::DescriptionOnly
        )
    }

    /// True when activating the title navigates to `url` (the renderer must
    /// open it in a new browsing context without referrer/opener leakage).
    pub fn navigates(&self) -> bool {
        matches!(
            self.variant,
            DisplayVariant::LinkOnly | DisplayVariant::LinkWithDescription
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog walk helpers
// ────────────────────────────────────────────────────────────────────────────

impl Catalog {
    pub fn branch(&self, id: BranchId) -> &Branch {
        &self.branches[id.0]
    }

    pub fn leaf(&self, id: LeafId) -> &Leaf {
        &self.leaves[id.0]
    }

    /// Number of branches (categories and leaf groups alike).
    pub fn category_count(&self) -> usize {
        self.branches.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Walk all branches depth-first in display order, calling `cb` with the
    /// nesting depth of every branch.
    pub fn walk_branches<F>(&self, cb: &mut F)
    where
        F: FnMut(usize, BranchId, &Branch),
    {
        fn go<F: FnMut(usize, BranchId, &Branch)>(
            cat: &Catalog,
            id: BranchId,
            depth: usize,
            cb: &mut F,
        ) {
            let branch = cat.branch(id);
            cb(depth, id, branch);
            if let BranchChildren::Categories(subs) = &branch.children {
                for sub in subs {
                    go(cat, *sub, depth + 1, cb);
                }
            }
        }
        for root in &self.roots {
            go(self, *root, 0, cb);
        }
    }
}
