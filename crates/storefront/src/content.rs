//! Markdown content pages.
//!
//! Pages such as About Us are markdown files with YAML frontmatter under
//! `{content_dir}/pages/`. They are loaded and rendered once at startup and
//! served from memory, keyed by file stem.
//!
//! ```markdown
//! ---
//! title: About Us
//! description: Who we are
//! ---
//! Handmade clothing from the Kathmandu valley.
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

/// Frontmatter for a page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// In-memory store of rendered pages.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load all pages from `{content_dir}/pages`.
    ///
    /// A missing directory yields an empty store. Files that fail to parse
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let dir = content_dir.join("pages");
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_page(&path) {
                    Ok(page) => {
                        tracing::info!("Loaded page: {}", page.slug);
                        pages.insert(page.slug.clone(), page);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Build a store from already-parsed pages.
    #[must_use]
    pub fn from_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .into_iter()
                    .map(|page| (page.slug.clone(), page))
                    .collect(),
            ),
        }
    }

    fn load_page(path: &Path) -> Result<Page, ContentError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?;

        parse_page(slug, &raw)
    }

    /// Get a page by slug
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    /// Number of loaded pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Parse frontmatter and render the markdown body of a page.
///
/// # Errors
///
/// Returns `ContentError::Parse` if the frontmatter is missing or invalid.
pub fn parse_page(slug: &str, raw: &str) -> Result<Page, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(raw)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(Page {
        slug: slug.to_owned(),
        meta,
        content_html: render_markdown(&parsed.content),
    })
}

/// Render markdown to HTML with GitHub Flavored Markdown extensions.
///
/// Raw HTML in the source is escaped.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
