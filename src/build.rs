//! Builds the immutable [`Catalog`] tree from a raw nested value.
//!
//! The raw value comes from the loader (YAML or JSON, both land in a
//! [`serde_json::Value`]). Mapping values become categories, sequence values
//! become leaf groups, and anything else (null, scalar at a branch position)
//! is silently dropped and counted.

use indexmap::IndexMap;
use serde_json::Value;

use crate::model::{Branch, BranchChildren, BranchId, Catalog, Leaf, LeafId, LeafRecord};

/// Result of building a catalog: the tree itself plus the number of raw
/// nodes that were dropped for not matching the input contract.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub catalog: Catalog,
    pub dropped: usize,
}

impl Catalog {
    /// Build a catalog from a raw nested mapping.
    ///
    /// Keys are visited in ascending case-insensitive order (ties broken by
    /// the raw key), fixed here and never resorted. Building twice from the
    /// same value yields an identical catalog.
    pub fn build(raw: &Value) -> BuildOutcome {
        let mut builder = Builder {
            branches: Vec::new(),
            leaves: Vec::new(),
            dropped: 0,
        };
        let roots = match raw {
            Value::Object(map) => builder.build_children(map, None),
            _ => Vec::new(),
        };
        BuildOutcome {
            catalog: Catalog {
                roots,
                branches: builder.branches,
                leaves: builder.leaves,
            },
            dropped: builder.dropped,
        }
    }
}

struct Builder {
    branches: Vec<Branch>,
    leaves: Vec<Leaf>,
    dropped: usize,
}

impl Builder {
    /// Emit the branches for one raw mapping level, returning their ids in
    /// display order. Branches are pushed parent-first so the flat vector
    /// stays in pre-order.
    fn build_children(
        &mut self,
        map: &serde_json::Map<String, Value>,
        parent: Option<BranchId>,
    ) -> Vec<BranchId> {
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });

        let mut ids = Vec::new();
        for key in keys {
            match &map[key] {
                Value::Array(items) => {
                    let id = self.push_branch(key, parent);
                    let leaf_ids = self.build_leaf_group(id, items);
                    self.branches[id.0].children = BranchChildren::Leaves(leaf_ids);
                    ids.push(id);
                }
                Value::Object(sub) => {
                    let id = self.push_branch(key, parent);
                    let child_ids = self.build_children(sub, Some(id));
                    self.branches[id.0].children = BranchChildren::Categories(child_ids);
                    ids.push(id);
                }
                // Null or scalar at a branch position: not an error.
                _ => self.dropped += 1,
            }
        }
        ids
    }

    fn push_branch(&mut self, name: &str, parent: Option<BranchId>) -> BranchId {
        let id = BranchId(self.branches.len());
        self.branches.push(Branch {
            name: name.to_string(),
            parent,
            children: BranchChildren::Categories(Vec::new()),
        });
        id
    }

    fn build_leaf_group(&mut self, group: BranchId, items: &[Value]) -> Vec<LeafId> {
        let mut ids = Vec::new();
        for item in items {
            let id = LeafId(self.leaves.len());
            self.leaves.push(Leaf {
                group,
                record: build_record(item),
            });
            ids.push(id);
        }
        ids
    }
}

/// Normalize one raw sequence item into a [`LeafRecord`].
///
/// Missing fields default to the empty string and non-string scalars are
/// coerced to their string form, so a malformed record still renders (as
/// plain text in the worst case) instead of failing the load.
fn build_record(item: &Value) -> LeafRecord {
    let Value::Object(map) = item else {
        return LeafRecord::new(String::new(), String::new(), String::new());
    };
    let name = coerce_field(map.get("name"));
    let url = coerce_field(map.get("url"));
    let description = coerce_field(map.get("description"));
    let mut extra = IndexMap::new();
    for (key, value) in map {
        if matches!(key.as_str(), "name" | "url" | "description") {
            continue;
        }
        if let Some(text) = coerce_scalar(value) {
            extra.insert(key.clone(), text);
        }
    }
    LeafRecord::with_extra(name, url, description, extra)
}

fn coerce_field(value: Option<&Value>) -> String {
    value
        .and_then(coerce_scalar)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// String form of a scalar value; `None` for null and nested containers.
fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
