use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;

use linkgrove::engine::{CatalogEngine, Row};
use linkgrove::loader::load_catalog_file;

#[derive(Parser, Debug)]
#[command(author, version, about = "Parse and search hierarchical link catalogs", long_about = None)]
struct Cli {
    /// Catalog file (.yaml, .yml, or .json)
    #[arg(value_name = "CATALOG_FILE")]
    catalog_file: String,

    /// Run a search query and print the visible tree with match counts
    #[arg(short, long)]
    query: Option<String>,

    /// Print category/leaf counts only
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = Utf8PathBuf::from(&cli.catalog_file);
    let outcome =
        load_catalog_file(&path).with_context(|| format!("Failed to load {}", path))?;

    if cli.stats {
        println!(
            "{} categories, {} items ({} raw nodes dropped)",
            outcome.catalog.category_count(),
            outcome.catalog.leaf_count(),
            outcome.dropped
        );
        return Ok(());
    }

    match cli.query {
        Some(q) => {
            let mut engine = CatalogEngine::new(outcome.catalog);
            let summary = engine.apply_search(&q);
            print_tree(&engine);
            println!(
                "match: {} items, {} categories",
                summary.matched_leaf_count, summary.matched_branch_count
            );
        }
        None => {
            let json = serde_json::to_string_pretty(&outcome.catalog)?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn print_tree(engine: &CatalogEngine) {
    for row in engine.visible_rows() {
        match row {
            Row::Branch { id, depth } => {
                let (branch, state) = engine.branch_ref(id);
                let twisty = if state.open { "v" } else { ">" };
                println!("{}{} {}", "  ".repeat(depth), twisty, branch.name);
            }
            Row::Leaf { id, depth } => {
                let indent = "  ".repeat(depth);
                let title = engine.title_text(id);
                match engine.secondary_text(id) {
                    Some(url) => println!("{}- {} ({})", indent, title, url),
                    None => println!("{}- {}", indent, title),
                }
            }
        }
    }
}
