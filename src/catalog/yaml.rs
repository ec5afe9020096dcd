//! YAML Catalog

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::debug;

use crate::{
    catalog::{
        Catalog, CatalogError, CatalogPage, CatalogQuery, CoverImage, Manga, MangaId, MangaTitle,
        PageInfo,
    },
    prices::Price,
};

/// Wrapper for catalog records in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    manga: Vec<MangaFixture>,
}

/// A catalog record as written in YAML, with its price as `"AMOUNT EUR"`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MangaFixture {
    id: MangaId,
    title: MangaTitle,
    cover_image: CoverImage,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    average_score: Option<u32>,
    #[serde(default)]
    popularity: u64,
    status: String,
    #[serde(default)]
    volumes: Option<u32>,
    #[serde(default)]
    chapters: Option<u32>,
    price: String,
    stock: u32,
}

impl TryFrom<MangaFixture> for Manga {
    type Error = CatalogError;

    fn try_from(fixture: MangaFixture) -> Result<Self, Self::Error> {
        let price = Price::parse_with_currency(&fixture.price).map_err(|source| {
            CatalogError::InvalidPrice {
                id: fixture.id,
                source,
            }
        })?;

        Ok(Manga {
            id: fixture.id,
            title: fixture.title,
            cover_image: fixture.cover_image,
            description: fixture.description,
            genres: fixture.genres,
            average_score: fixture.average_score,
            popularity: fixture.popularity,
            status: fixture.status,
            volumes: fixture.volumes,
            chapters: fixture.chapters,
            price,
            stock: fixture.stock,
        })
    }
}

/// A catalog held in memory, loaded from a YAML document.
#[derive(Debug, Clone, Default)]
pub struct YamlCatalog {
    records: Vec<Manga>,
    index: FxHashMap<MangaId, usize>,
}

impl YamlCatalog {
    /// Build a catalog from records, ordering them by popularity.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two records share an id.
    pub fn from_manga(mut records: Vec<Manga>) -> Result<Self, CatalogError> {
        records.sort_by(|a, b| b.popularity.cmp(&a.popularity));

        let mut index = FxHashMap::default();

        for (position, manga) in records.iter().enumerate() {
            if index.insert(manga.id, position).is_some() {
                return Err(CatalogError::DuplicateId(manga.id));
            }
        }

        Ok(YamlCatalog { records, index })
    }

    /// Parse a catalog from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed, a price is invalid
    /// or two records share an id.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let records = fixture
            .manga
            .into_iter()
            .map(Manga::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_manga(records)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let catalog = Self::from_yaml_str(&fs::read_to_string(path)?)?;

        debug!(path = %path.display(), records = catalog.len(), "loaded catalog");

        Ok(catalog)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the catalog has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Catalog for YamlCatalog {
    fn page(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError> {
        let matching: Vec<&Manga> = self
            .records
            .iter()
            .filter(|manga| query.accepts(manga))
            .collect();

        let per_page = query.page_size().max(1);
        let current_page = query.current_page().max(1);
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let last_page = u32::try_from(total.div_ceil(u64::from(per_page)))
            .unwrap_or(u32::MAX)
            .max(1);

        let skip = usize::try_from(u64::from(current_page - 1) * u64::from(per_page))
            .unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(usize::MAX);

        let media = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect();

        Ok(CatalogPage {
            page_info: PageInfo {
                total,
                current_page,
                last_page,
                has_next_page: current_page < last_page,
                per_page,
            },
            media,
        })
    }

    fn get(&self, id: MangaId) -> Result<Option<Manga>, CatalogError> {
        Ok(self
            .index
            .get(&id)
            .and_then(|&position| self.records.get(position))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const YAML: &str = r#"
manga:
  - id: 1
    title: { romaji: Berserk, english: Berserk, native: ベルセルク }
    coverImage: { large: "https://img.example/1-l.jpg", medium: "https://img.example/1-m.jpg" }
    genres: [Action, Drama, Horror]
    averageScore: 93
    popularity: 500
    status: RELEASING
    price: 12.50 EUR
    stock: 4
  - id: 2
    title: { romaji: Yotsuba to!, native: よつばと! }
    coverImage: { large: "https://img.example/2-l.jpg", medium: "https://img.example/2-m.jpg" }
    genres: [Comedy, Slice of Life]
    popularity: 900
    status: RELEASING
    price: 8.00 EUR
    stock: 10
  - id: 3
    title: { romaji: Monster, english: Monster, native: MONSTER }
    coverImage: { large: "https://img.example/3-l.jpg", medium: "https://img.example/3-m.jpg" }
    genres: [Drama, Mystery, Psychological]
    popularity: 100
    status: FINISHED
    volumes: 18
    chapters: 162
    price: 9.99 EUR
    stock: 6
"#;

    #[test]
    fn parses_records_and_prices() -> TestResult {
        let catalog = YamlCatalog::from_yaml_str(YAML)?;

        let berserk = catalog.get(1)?.ok_or("expected Berserk")?;

        assert_eq!(catalog.len(), 3);
        assert_eq!(berserk.price, Price::from_cents(1250));
        assert_eq!(berserk.stock, 4);
        assert_eq!(berserk.average_score, Some(93));
        assert_eq!(catalog.get(42)?, None);

        Ok(())
    }

    #[test]
    fn pages_are_ordered_by_popularity() -> TestResult {
        let catalog = YamlCatalog::from_yaml_str(YAML)?;

        let page = catalog.page(&CatalogQuery::new())?;
        let ids: Vec<MangaId> = page.media.iter().map(|manga| manga.id).collect();

        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(page.page_info.total, 3);
        assert_eq!(page.page_info.last_page, 1);
        assert!(!page.page_info.has_next_page);

        Ok(())
    }

    #[test]
    fn paginates() -> TestResult {
        let catalog = YamlCatalog::from_yaml_str(YAML)?;

        let first = catalog.page(&CatalogQuery::new().per_page(2))?;
        let second = catalog.page(&CatalogQuery::new().per_page(2).page(2))?;
        let beyond = catalog.page(&CatalogQuery::new().per_page(2).page(5))?;

        assert_eq!(first.media.len(), 2);
        assert!(first.page_info.has_next_page);
        assert_eq!(first.page_info.last_page, 2);
        assert_eq!(second.media.len(), 1);
        assert!(!second.page_info.has_next_page);
        assert!(beyond.media.is_empty());
        assert!(!beyond.page_info.has_next_page);

        Ok(())
    }

    #[test]
    fn filters_by_search_and_genre() -> TestResult {
        let catalog = YamlCatalog::from_yaml_str(YAML)?;

        let drama = catalog.page(&CatalogQuery::new().genre("drama"))?;
        let search = catalog.search("yotsuba", 10)?;
        let both = catalog.page(&CatalogQuery::new().genre("Drama").search("mon"))?;

        assert_eq!(drama.page_info.total, 2);
        assert_eq!(search.len(), 1);
        assert_eq!(both.media.first().map(|manga| manga.id), Some(3));

        Ok(())
    }

    #[test]
    fn empty_results_still_report_one_page() -> TestResult {
        let catalog = YamlCatalog::from_yaml_str(YAML)?;

        let page = catalog.page(&CatalogQuery::new().search("nothing like this"))?;

        assert_eq!(page.page_info.total, 0);
        assert_eq!(page.page_info.last_page, 1);

        Ok(())
    }

    #[test]
    fn popular_limits_results() -> TestResult {
        let catalog = YamlCatalog::from_yaml_str(YAML)?;

        let popular = catalog.popular(1)?;

        assert_eq!(popular.first().map(|manga| manga.id), Some(2));
        assert_eq!(popular.len(), 1);
        assert!(catalog.genres().contains(&"Slice of Life"));

        Ok(())
    }

    #[test]
    fn rejects_non_euro_prices() {
        let yaml = YAML.replace("12.50 EUR", "12.50 GBP");

        let result = YamlCatalog::from_yaml_str(&yaml);

        assert!(matches!(result, Err(CatalogError::InvalidPrice { id: 1, .. })));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let yaml = YAML.replace("- id: 3", "- id: 1");

        let result = YamlCatalog::from_yaml_str(&yaml);

        assert!(matches!(result, Err(CatalogError::DuplicateId(1))));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(matches!(
            YamlCatalog::from_yaml_str("manga: [{ id: one }]"),
            Err(CatalogError::Yaml(_))
        ));
    }
}
