use linkgrove::engine::{CatalogEngine, EngineOptions, Row, Strings};
use linkgrove::loader::{CatalogFormat, parse_catalog_str};
use linkgrove::model::{BranchId, Catalog, LeafId};

fn catalog(yaml: &str) -> Catalog {
    parse_catalog_str(yaml, CatalogFormat::Yaml, "test.yaml")
        .expect("parse catalog")
        .catalog
}

fn branch_named(catalog: &Catalog, name: &str) -> BranchId {
    let idx = catalog
        .branches
        .iter()
        .position(|b| b.name == name)
        .unwrap_or_else(|| panic!("no branch named {name}"));
    BranchId(idx)
}

fn leaf_named(catalog: &Catalog, name: &str) -> LeafId {
    let idx = catalog
        .leaves
        .iter()
        .position(|l| l.record.name == name)
        .unwrap_or_else(|| panic!("no leaf named {name}"));
    LeafId(idx)
}

const FIXTURE: &str = r#"
Development:
  Tools:
    - name: ripgrep
      url: https://github.com/BurntSushi/ripgrep
      description: line-oriented search
    - name: fd
      url: https://github.com/sharkdp/fd
Notes:
  - name: todo
    description: "collect bookmarks\nand sort them"
  - name: plain entry
  - {}
"#;

#[test]
fn leaf_groups_start_open_categories_start_closed() {
    let cat = catalog(FIXTURE);
    let engine = CatalogEngine::new(cat);
    let c = engine.catalog();
    assert!(!engine.branch_state(branch_named(c, "Development")).open);
    assert!(engine.branch_state(branch_named(c, "Tools")).open);
    assert!(engine.branch_state(branch_named(c, "Notes")).open);
}

#[test]
fn leaf_group_default_open_is_a_policy_flag() {
    let options = EngineOptions {
        leaf_groups_start_open: false,
        ..EngineOptions::default()
    };
    let engine = CatalogEngine::with_options(catalog(FIXTURE), options);
    let c = engine.catalog();
    assert!(!engine.branch_state(branch_named(c, "Tools")).open);
    assert!(!engine.branch_state(branch_named(c, "Notes")).open);
}

#[test]
fn toggle_open_close_branch() {
    let mut engine = CatalogEngine::new(catalog(FIXTURE));
    let dev = branch_named(engine.catalog(), "Development");

    engine.toggle_branch(dev);
    assert!(engine.branch_state(dev).open);
    engine.toggle_branch(dev);
    assert!(!engine.branch_state(dev).open);

    engine.open_branch(dev);
    engine.open_branch(dev);
    assert!(engine.branch_state(dev).open);
    engine.close_branch(dev);
    assert!(!engine.branch_state(dev).open);
}

#[test]
fn description_toggle_is_per_leaf_and_independent() {
    let mut engine = CatalogEngine::new(catalog(FIXTURE));
    let c = engine.catalog();
    let todo = leaf_named(c, "todo");
    let ripgrep = leaf_named(c, "ripgrep");
    let before_branches: Vec<bool> = (0..engine.catalog().category_count())
        .map(|i| engine.branch_state(BranchId(i)).open)
        .collect();

    assert!(!engine.leaf_state(todo).expanded);
    engine.toggle_description(todo);
    assert!(engine.leaf_state(todo).expanded);

    // No other leaf or branch state moved.
    assert!(!engine.leaf_state(ripgrep).expanded);
    let after_branches: Vec<bool> = (0..engine.catalog().category_count())
        .map(|i| engine.branch_state(BranchId(i)).open)
        .collect();
    assert_eq!(before_branches, after_branches);

    engine.toggle_description(todo);
    assert!(!engine.leaf_state(todo).expanded);
}

#[test]
fn description_toggle_is_a_noop_without_description() {
    let mut engine = CatalogEngine::new(catalog(FIXTURE));
    let fd = leaf_named(engine.catalog(), "fd");
    let plain = leaf_named(engine.catalog(), "plain entry");
    engine.toggle_description(fd);
    engine.toggle_description(plain);
    assert!(!engine.leaf_state(fd).expanded);
    assert!(!engine.leaf_state(plain).expanded);
}

#[test]
fn marker_reflects_expansion_state() {
    let mut engine = CatalogEngine::new(catalog(FIXTURE));
    let todo = leaf_named(engine.catalog(), "todo");
    let fd = leaf_named(engine.catalog(), "fd");

    assert_eq!(engine.marker(fd), None);
    assert_eq!(engine.marker(todo), Some("[+]"));
    engine.toggle_description(todo);
    assert_eq!(engine.marker(todo), Some("[-]"));
}

#[test]
fn expand_all_opens_branches_and_descriptions() {
    let mut engine = CatalogEngine::new(catalog(FIXTURE));
    engine.expand_all();
    for i in 0..engine.catalog().category_count() {
        assert!(engine.branch_state(BranchId(i)).open);
    }
    let todo = leaf_named(engine.catalog(), "todo");
    let ripgrep = leaf_named(engine.catalog(), "ripgrep");
    assert!(engine.leaf_state(todo).expanded);
    assert!(engine.leaf_state(ripgrep).expanded);
}

#[test]
fn expand_all_description_policy_can_be_disabled() {
    let options = EngineOptions {
        expand_all_expands_descriptions: false,
        ..EngineOptions::default()
    };
    let mut engine = CatalogEngine::with_options(catalog(FIXTURE), options);
    engine.expand_all();
    for i in 0..engine.catalog().category_count() {
        assert!(engine.branch_state(BranchId(i)).open);
    }
    let todo = leaf_named(engine.catalog(), "todo");
    assert!(!engine.leaf_state(todo).expanded);
}

#[test]
fn collapse_all_closes_branches_and_descriptions() {
    let mut engine = CatalogEngine::new(catalog(FIXTURE));
    let todo = leaf_named(engine.catalog(), "todo");
    engine.toggle_description(todo);
    engine.expand_all();

    engine.collapse_all();
    for i in 0..engine.catalog().category_count() {
        assert!(!engine.branch_state(BranchId(i)).open);
    }
    assert!(!engine.leaf_state(todo).expanded);
}

#[test]
fn display_accessors_follow_the_variant() {
    let engine = CatalogEngine::new(catalog(FIXTURE));
    let c = engine.catalog();

    let ripgrep = leaf_named(c, "ripgrep");
    assert_eq!(engine.title_text(ripgrep), "ripgrep");
    assert_eq!(
        engine.secondary_text(ripgrep),
        Some("https://github.com/BurntSushi/ripgrep")
    );
    assert_eq!(engine.tooltip_text(ripgrep), Some("line-oriented search"));
    assert_eq!(engine.block_text(ripgrep), Some("line-oriented search"));
    assert!(c.leaf(ripgrep).record.navigates());

    let fd = leaf_named(c, "fd");
    assert_eq!(engine.tooltip_text(fd), None);
    assert_eq!(engine.block_text(fd), None);

    let todo = leaf_named(c, "todo");
    assert_eq!(engine.title_text(todo), "todo");
    assert_eq!(engine.secondary_text(todo), None);
    assert_eq!(engine.tooltip_text(todo), None);
    assert_eq!(
        engine.block_text(todo),
        Some("collect bookmarks\nand sort them")
    );
    assert!(!c.leaf(todo).record.navigates());
}

#[test]
fn url_only_leaf_uses_the_url_as_title() {
    let engine = CatalogEngine::new(catalog(
        r#"
Links:
  - url: https://bare.example
"#,
    ));
    let id = LeafId(0);
    assert_eq!(engine.title_text(id), "https://bare.example");
    // The secondary label only appears when a name is also present.
    assert_eq!(engine.secondary_text(id), None);
}

#[test]
fn empty_leaf_gets_a_placeholder_title() {
    let engine = CatalogEngine::new(catalog(FIXTURE));
    let c = engine.catalog();
    let empty = LeafId(
        c.leaves
            .iter()
            .position(|l| l.record.name.is_empty() && l.record.url.is_empty())
            .expect("all-empty leaf"),
    );
    assert_eq!(engine.title_text(empty), "(empty)");
}

#[test]
fn placeholder_strings_are_configurable() {
    let options = EngineOptions {
        strings: Strings::polish(),
        ..EngineOptions::default()
    };
    let engine = CatalogEngine::with_options(
        catalog(
            r#"
Notes:
  - description: only a description
  - {}
"#,
        ),
        options,
    );
    assert_eq!(engine.title_text(LeafId(0)), "(opis)");
    assert_eq!(engine.title_text(LeafId(1)), "(brak)");
}

#[test]
fn visible_rows_skip_children_of_closed_branches() {
    let mut engine = CatalogEngine::new(catalog(FIXTURE));
    let c = engine.catalog();
    let dev = branch_named(c, "Development");
    let tools = branch_named(c, "Tools");
    let notes = branch_named(c, "Notes");

    // Development starts closed: only the two roots and Notes' leaves show.
    let rows = engine.visible_rows();
    assert!(rows.contains(&Row::Branch { id: dev, depth: 0 }));
    assert!(!rows.iter().any(|r| matches!(r, Row::Branch { id, .. } if *id == tools)));
    assert!(rows.contains(&Row::Branch { id: notes, depth: 0 }));
    assert_eq!(
        rows.iter().filter(|r| matches!(r, Row::Leaf { .. })).count(),
        3
    );

    engine.open_branch(dev);
    let rows = engine.visible_rows();
    assert!(rows.contains(&Row::Branch { id: tools, depth: 1 }));
    assert_eq!(
        rows.iter().filter(|r| matches!(r, Row::Leaf { .. })).count(),
        5
    );
}

#[test]
fn stats_expose_category_and_leaf_counts() {
    let engine = CatalogEngine::new(catalog(FIXTURE));
    let stats = engine.stats();
    // Branches of both kinds count as categories: Development, Tools, Notes.
    assert_eq!(stats.category_count, 3);
    assert_eq!(stats.leaf_count, 5);
    assert_eq!(engine.search_summary(), None);
}
