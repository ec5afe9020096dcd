//! Catalog
//!
//! Record types and the lookup contract of the manga catalog the cart sells
//! from. The shapes follow AniList's `Media` and `PageInfo` objects, extended
//! with the store's own `price` and `stock`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prices::{Price, PriceError};

mod yaml;

pub use yaml::YamlCatalog;

/// Catalog identifier of a manga.
pub type MangaId = u64;

/// Page size used when a query does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Genres offered as filters.
pub const GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Fantasy",
    "Hentai",
    "Horror",
    "Mystery",
    "Psychological",
    "Romance",
    "Sci-Fi",
    "Slice of Life",
    "Sports",
    "Supernatural",
    "Thriller",
];

/// Catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog source could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog source is not valid YAML for the expected shape.
    #[error("failed to parse catalog: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A record carries an unusable price.
    #[error("invalid price for manga {id}: {source}")]
    InvalidPrice {
        /// Record identifier
        id: MangaId,

        /// Underlying price error
        #[source]
        source: PriceError,
    },

    /// Two records share an identifier.
    #[error("duplicate manga id {0}")]
    DuplicateId(MangaId),
}

/// Title variants of a manga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MangaTitle {
    /// Romanised title
    pub romaji: String,

    /// English title, when licensed
    #[serde(default)]
    pub english: Option<String>,

    /// Title in the original script
    pub native: String,
}

impl MangaTitle {
    /// The title shown to shoppers: English when present, otherwise romaji.
    pub fn display(&self) -> &str {
        self.english
            .as_deref()
            .map(str::trim)
            .filter(|english| !english.is_empty())
            .unwrap_or(&self.romaji)
    }

    /// Whether any variant contains `needle`, ignoring case.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();

        [Some(&self.romaji), self.english.as_ref(), Some(&self.native)]
            .into_iter()
            .flatten()
            .any(|title| title.to_lowercase().contains(&needle))
    }
}

/// Cover image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    /// Large cover
    pub large: String,

    /// Medium cover
    pub medium: String,
}

/// A manga as sold by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manga {
    /// Catalog identifier
    pub id: MangaId,

    /// Title variants
    pub title: MangaTitle,

    /// Cover images
    pub cover_image: CoverImage,

    /// Synopsis, possibly containing HTML
    #[serde(default)]
    pub description: Option<String>,

    /// Genre names
    #[serde(default)]
    pub genres: Vec<String>,

    /// Average score out of 100
    #[serde(default)]
    pub average_score: Option<u32>,

    /// Number of users tracking the manga
    #[serde(default)]
    pub popularity: u64,

    /// Publication status, e.g. `RELEASING`
    pub status: String,

    /// Volume count, if finished
    #[serde(default)]
    pub volumes: Option<u32>,

    /// Chapter count, if finished
    #[serde(default)]
    pub chapters: Option<u32>,

    /// Unit price
    pub price: Price,

    /// Units available
    pub stock: u32,
}

impl Manga {
    /// Whether the manga is tagged with `genre`, ignoring case.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(genre))
    }
}

/// Pagination metadata for a catalog page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Number of matching records across all pages
    pub total: u64,

    /// Page returned
    pub current_page: u32,

    /// Last page holding results, at least 1
    pub last_page: u32,

    /// Whether a later page exists
    pub has_next_page: bool,

    /// Page size used
    pub per_page: u32,
}

/// A page of catalog results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    /// Pagination metadata
    pub page_info: PageInfo,

    /// Records on this page, most popular first
    pub media: Vec<Manga>,
}

/// Paging and filters for a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    page: u32,
    per_page: u32,
    search: Option<String>,
    genre: Option<String>,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        CatalogQuery {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: None,
            genre: None,
        }
    }
}

impl CatalogQuery {
    /// First page, default page size, no filters.
    #[must_use]
    pub fn new() -> Self {
        CatalogQuery::default()
    }

    /// Request a 1-based page. Zero is treated as the first page.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the page size. Zero is treated as one.
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Filter by title. Blank text clears the filter.
    #[must_use]
    pub fn search(mut self, text: impl AsRef<str>) -> Self {
        self.search = non_blank(text.as_ref());
        self
    }

    /// Filter by genre. Blank text clears the filter.
    #[must_use]
    pub fn genre(mut self, genre: impl AsRef<str>) -> Self {
        self.genre = non_blank(genre.as_ref());
        self
    }

    /// Requested page.
    pub fn current_page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    pub fn page_size(&self) -> u32 {
        self.per_page
    }

    /// Title filter, if any.
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Genre filter, if any.
    pub fn genre_name(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Whether `manga` passes the filters.
    pub fn accepts(&self, manga: &Manga) -> bool {
        self.search
            .as_deref()
            .is_none_or(|text| manga.title.matches(text))
            && self.genre.as_deref().is_none_or(|genre| manga.has_genre(genre))
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A source of manga records.
pub trait Catalog {
    /// Fetch one page of records matching the query, most popular first.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be queried.
    fn page(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError>;

    /// Look up a single record.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be queried.
    fn get(&self, id: MangaId) -> Result<Option<Manga>, CatalogError>;

    /// The `limit` most popular records.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be queried.
    fn popular(&self, limit: u32) -> Result<Vec<Manga>, CatalogError> {
        Ok(self.page(&CatalogQuery::new().per_page(limit))?.media)
    }

    /// Up to `limit` records whose title matches `text`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be queried.
    fn search(&self, text: &str, limit: u32) -> Result<Vec<Manga>, CatalogError> {
        Ok(self
            .page(&CatalogQuery::new().per_page(limit).search(text))?
            .media)
    }

    /// Genres available as filters.
    fn genres(&self) -> &'static [&'static str] {
        GENRES
    }
}
