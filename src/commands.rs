use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use tracing::info;

use crate::catalog::{BookRecord, CatalogItem, Category, PaperRecord};
use crate::config::Config;
use crate::embeddings::OllamaClient;
use crate::index::CatalogIndex;
use crate::service::RecommendationService;

/// Build the catalog index from cleaned dataset files and persist it
#[inline]
pub fn build_index(
    config: &Config,
    books_path: Option<&Path>,
    papers_path: Option<&Path>,
    snapshot_override: Option<PathBuf>,
) -> Result<()> {
    if books_path.is_none() && papers_path.is_none() {
        bail!("At least one of --books or --papers is required");
    }

    let mut items = Vec::new();
    if let Some(path) = books_path {
        let books = load_book_records(path)?;
        info!("Loaded {} book records from {}", books.len(), path.display());
        items.extend(books);
    }
    if let Some(path) = papers_path {
        let papers = load_paper_records(path)?;
        info!(
            "Loaded {} paper records from {}",
            papers.len(),
            path.display()
        );
        items.extend(papers);
    }

    let client = OllamaClient::new(config).context("Failed to initialize Ollama client")?;
    client
        .health_check()
        .context("Embedding model is unavailable; cannot build the index")?;

    let spinner = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner} {msg}").context("Invalid progress template")?,
    );
    spinner.set_message(format!(
        "Embedding {} items with {}",
        items.len(),
        config.ollama.model
    ));
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));

    let index = CatalogIndex::build(items, &client)?;

    spinner.finish_and_clear();

    let snapshot_path = resolve_snapshot_path(config, snapshot_override)?;
    index.save_snapshot(&snapshot_path)?;

    println!("Index built successfully!");
    println!("  Books: {}", index.item_count(Category::Book));
    println!("  Papers: {}", index.item_count(Category::Paper));
    println!("  Dimension: {}", index.dimension());
    println!("  Model: {}", index.model());
    println!("  Snapshot: {}", snapshot_path.display());

    Ok(())
}

/// Answer a query from a previously built snapshot, printing the
/// recommendations as JSON on stdout
#[inline]
pub fn run_recommend(
    config: &Config,
    query: &str,
    n_books: i64,
    n_papers: i64,
    snapshot_override: Option<PathBuf>,
) -> Result<()> {
    let snapshot_path = resolve_snapshot_path(config, snapshot_override)?;
    let index = CatalogIndex::load_snapshot(&snapshot_path)
        .context("No usable index snapshot; run `bookrec build` first")?;

    let client = OllamaClient::new(config).context("Failed to initialize Ollama client")?;
    client
        .health_check()
        .context("Embedding model is unavailable; cannot answer queries")?;

    let service = RecommendationService::new(Arc::new(client));
    service.install_index(index)?;

    let recommendations = service.recommend(query, n_books, n_papers)?;

    let json = serde_json::to_string_pretty(&recommendations)
        .context("Failed to serialize recommendations")?;
    println!("{}", json);

    Ok(())
}

/// Show metadata about the current index snapshot
#[inline]
pub fn show_status(config: &Config, snapshot_override: Option<PathBuf>) -> Result<()> {
    let snapshot_path = resolve_snapshot_path(config, snapshot_override)?;

    if !snapshot_path.exists() {
        println!("No index snapshot found at {}", snapshot_path.display());
        println!("Run `bookrec build` to create one.");
        return Ok(());
    }

    let index = CatalogIndex::load_snapshot(&snapshot_path)?;

    println!("Index snapshot: {}", snapshot_path.display());
    println!("  Model: {}", index.model());
    println!("  Dimension: {}", index.dimension());
    println!("  Built at: {}", index.built_at());
    println!(
        "  Categories: {}",
        index.categories().iter().map(|c| c.as_str()).join(", ")
    );
    println!("  Books: {}", index.item_count(Category::Book));
    println!("  Papers: {}", index.item_count(Category::Paper));

    Ok(())
}

fn resolve_snapshot_path(config: &Config, snapshot_override: Option<PathBuf>) -> Result<PathBuf> {
    match snapshot_override {
        Some(path) => Ok(path),
        None => config
            .snapshot_path()
            .context("Failed to determine snapshot path"),
    }
}

fn load_book_records(path: &Path) -> Result<Vec<CatalogItem>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read books dataset: {}", path.display()))?;
    let records: Vec<BookRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse books dataset: {}", path.display()))?;
    Ok(records.into_iter().map(CatalogItem::from_book).collect())
}

fn load_paper_records(path: &Path) -> Result<Vec<CatalogItem>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read papers dataset: {}", path.display()))?;
    let records: Vec<PaperRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse papers dataset: {}", path.display()))?;
    Ok(records.into_iter().map(CatalogItem::from_paper).collect())
}
