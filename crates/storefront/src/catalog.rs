//! Product catalog and the search/filter engine.
//!
//! A product matches a [`FilterQuery`] when all four clauses pass: title
//! text, category, price band and minimum rating. Filtering is stable, so
//! matches keep their catalog order.

use core::fmt;
use core::str::FromStr;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use shopvista_core::{Price, ProductId, canonical_category};

/// Value used by the filter controls to mean "no restriction".
pub const ALL: &str = "all";

/// Highest rating a product can have.
pub const MAX_RATING: u8 = 5;

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while parsing filter control values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown price band: {0:?}")]
    UnknownPriceBand(String),

    #[error("rating must be \"all\" or a whole number from 0 to 5, got {0:?}")]
    InvalidRating(String),
}

/// A catalog product, as read from the catalog JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub price: Price,
    pub rating: Rating,
}

/// Star rating from 0 to 5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidRating` above 5.
    pub fn new(value: u8) -> Result<Self, FilterError> {
        if value > MAX_RATING {
            return Err(FilterError::InvalidRating(value.to_string()));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = FilterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A read-only list of products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON or invalid products
    /// (negative price, rating above 5).
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a catalog JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read and
    /// `CatalogError::Parse` if its contents are invalid.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!(products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Filter this catalog.
    #[must_use]
    pub fn filter(&self, query: &FilterQuery) -> FilterResult<'_> {
        filter(&self.products, query)
    }
}

/// Half-open price range selectable in the filter controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriceBand {
    #[default]
    All,
    /// `[0, 50)`
    Under50,
    /// `[50, 100)`
    From50To100,
    /// `[100, 200)`
    From100To200,
    /// `[200, 500)`
    From200To500,
    /// `[500, ∞)`
    From500,
}

impl PriceBand {
    /// Every band, in the order the controls list them.
    pub const ALL: [Self; 6] = [
        Self::All,
        Self::Under50,
        Self::From50To100,
        Self::From100To200,
        Self::From200To500,
        Self::From500,
    ];

    /// Control value for this band.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::Under50 => "0-50",
            Self::From50To100 => "50-100",
            Self::From100To200 => "100-200",
            Self::From200To500 => "200-500",
            Self::From500 => "500+",
        }
    }

    /// Lower (inclusive) and upper (exclusive) bounds, `None` meaning unbounded.
    #[must_use]
    pub fn bounds(self) -> (Option<Decimal>, Option<Decimal>) {
        let d = |n: i64| Some(Decimal::from(n));
        match self {
            Self::All => (None, None),
            Self::Under50 => (d(0), d(50)),
            Self::From50To100 => (d(50), d(100)),
            Self::From100To200 => (d(100), d(200)),
            Self::From200To500 => (d(200), d(500)),
            Self::From500 => (d(500), None),
        }
    }

    /// Whether an amount falls in this band.
    #[must_use]
    pub fn contains(self, amount: Decimal) -> bool {
        let (low, high) = self.bounds();
        low.is_none_or(|low| amount >= low) && high.is_none_or(|high| amount < high)
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceBand {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|band| band.as_str() == s)
            .ok_or_else(|| FilterError::UnknownPriceBand(s.to_string()))
    }
}

/// Search and filter criteria.
///
/// `None` for category or rating means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    pub text: String,
    pub category: Option<String>,
    pub price_band: PriceBand,
    pub min_rating: Option<Rating>,
}

impl FilterQuery {
    /// A query that matches every product.
    #[must_use]
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Build a query from raw filter control values.
    ///
    /// `"all"` (or an empty string) disables the category, price band and
    /// rating clauses.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownPriceBand` or `FilterError::InvalidRating`
    /// for values the controls never produce.
    pub fn parse(
        text: &str,
        category: &str,
        price_band: &str,
        min_rating: &str,
    ) -> Result<Self, FilterError> {
        let price_band = if price_band.trim().is_empty() {
            PriceBand::All
        } else {
            price_band.parse()?
        };

        Ok(Self {
            text: text.to_string(),
            category: parse_all_or(category, |c| Ok(c.to_string()))?,
            price_band,
            min_rating: parse_all_or(min_rating, |r| {
                r.parse::<u8>()
                    .ok()
                    .and_then(|n| Rating::new(n).ok())
                    .ok_or_else(|| FilterError::InvalidRating(r.to_string()))
            })?,
        })
    }

    /// Query for a navigation link: only the category clause, mapped from the
    /// link's label to its broad category.
    #[must_use]
    pub fn for_navigation(label: &str) -> Self {
        Self {
            category: Some(canonical_category(label).to_string()),
            ..Self::default()
        }
    }

    /// Clear every clause.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether a single product passes every clause.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_needle(&normalize_text(&self.text), product)
    }

    fn matches_needle(&self, needle: &str, product: &Product) -> bool {
        (needle.is_empty() || product.title.to_lowercase().contains(needle))
            && self
                .category
                .as_deref()
                .is_none_or(|category| product.category == category)
            && self.price_band.contains(product.price.amount())
            && self.min_rating.is_none_or(|min| product.rating >= min)
    }
}

fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

fn parse_all_or<T>(
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, FilterError>,
) -> Result<Option<T>, FilterError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
        Ok(None)
    } else {
        parse(raw).map(Some)
    }
}

/// Products matching a query, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult<'a> {
    pub matches: Vec<&'a Product>,
    pub count: usize,
}

impl FilterResult<'_> {
    /// Label for the results header.
    #[must_use]
    pub fn label(&self) -> String {
        results_label(self.count)
    }
}

/// Run a query against a product list.
#[instrument(skip(products), fields(catalog_size = products.len()))]
pub fn filter<'a>(products: &'a [Product], query: &FilterQuery) -> FilterResult<'a> {
    let needle = normalize_text(&query.text);
    let matches: Vec<&Product> = products
        .iter()
        .filter(|product| query.matches_needle(&needle, product))
        .collect();
    let count = matches.len();
    tracing::debug!(count, "Catalog filtered");
    FilterResult { matches, count }
}

/// Results header text, e.g. `"1 product found"`, `"12 products found"`.
#[must_use]
pub fn results_label(count: usize) -> String {
    if count == 1 {
        "1 product found".to_string()
    } else {
        format!("{count} products found")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, title: &str, category: &str, price: u32, rating: u8) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            category: category.to_string(),
            price: Price::from_cents(price * 100),
            rating: Rating::new(rating).unwrap(),
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product("p1", "Wireless Headphones", "electronics", 25, 4),
            product("p2", "Mystery Novel", "books", 75, 3),
            product("p3", "Laptop Pro", "electronics", 550, 5),
        ]
    }

    fn ids<'a>(result: &FilterResult<'a>) -> Vec<&'a str> {
        result.matches.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_match_all_returns_everything() {
        let products = sample();
        let result = filter(&products, &FilterQuery::match_all());
        assert_eq!(result.count, 3);
        assert_eq!(ids(&result), ["p1", "p2", "p3"]);
    }

    #[test]
    fn test_price_band_selects_middle_product() {
        let products = sample();
        let query = FilterQuery::parse("", "all", "50-100", "all").unwrap();
        let result = filter(&products, &query);
        assert_eq!(ids(&result), ["p2"]);
        assert_eq!(result.count, 1);
    }

    #[test]
    fn test_price_band_boundaries() {
        let d = |n: i64| Decimal::from(n);
        assert!(PriceBand::Under50.contains(d(0)));
        assert!(!PriceBand::Under50.contains(d(50)));
        assert!(PriceBand::From50To100.contains(d(50)));
        assert!(!PriceBand::From50To100.contains(d(100)));
        assert!(PriceBand::From200To500.contains(Decimal::new(49_999, 2)));
        assert!(!PriceBand::From200To500.contains(d(500)));
        assert!(PriceBand::From500.contains(d(500)));
        assert!(PriceBand::From500.contains(d(1_000_000)));
        assert!(PriceBand::All.contains(d(0)));
    }

    #[test]
    fn test_text_is_case_insensitive_and_trimmed() {
        let products = sample();
        let query = FilterQuery::parse("  LAPTOP ", "all", "all", "all").unwrap();
        assert_eq!(ids(&filter(&products, &query)), ["p3"]);
    }

    #[test]
    fn test_clauses_are_conjunctive() {
        let products = sample();
        let query = FilterQuery::parse("", "electronics", "all", "5").unwrap();
        assert_eq!(ids(&filter(&products, &query)), ["p3"]);

        let none = FilterQuery::parse("novel", "electronics", "all", "all").unwrap();
        let result = filter(&products, &none);
        assert!(result.matches.is_empty());
        assert_eq!(result.label(), "0 products found");
    }

    #[test]
    fn test_category_is_exact() {
        let products = sample();
        let query = FilterQuery::parse("", "Electronics", "all", "all").unwrap();
        assert_eq!(filter(&products, &query).count, 0);
    }

    #[test]
    fn test_rating_is_minimum() {
        let products = sample();
        let query = FilterQuery::parse("", "all", "all", "4").unwrap();
        assert_eq!(ids(&filter(&products, &query)), ["p1", "p3"]);
        let zero = FilterQuery::parse("", "all", "all", "0").unwrap();
        assert_eq!(filter(&products, &zero).count, 3);
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert_eq!(
            FilterQuery::parse("", "all", "10-20", "all"),
            Err(FilterError::UnknownPriceBand("10-20".to_string()))
        );
        assert_eq!(
            FilterQuery::parse("", "all", "all", "6"),
            Err(FilterError::InvalidRating("6".to_string()))
        );
        assert!(FilterQuery::parse("", "all", "all", "four").is_err());
    }

    #[test]
    fn test_price_band_round_trips_through_text() {
        for band in PriceBand::ALL {
            assert_eq!(band.as_str().parse::<PriceBand>().unwrap(), band);
        }
    }

    #[test]
    fn test_navigation_maps_label() {
        let query = FilterQuery::for_navigation("fiction");
        assert_eq!(query.category.as_deref(), Some("books"));
        assert_eq!(query.price_band, PriceBand::All);

        let unknown = FilterQuery::for_navigation("toys");
        assert_eq!(unknown.category.as_deref(), Some("toys"));
    }

    #[test]
    fn test_reset_clears_all_clauses() {
        let mut query = FilterQuery::parse("lamp", "home-garden", "500+", "3").unwrap();
        query.reset();
        assert_eq!(query, FilterQuery::match_all());
    }

    #[test]
    fn test_matches_agrees_with_filter() {
        let products = sample();
        let query = FilterQuery::parse("o", "all", "all", "3").unwrap();
        let expected: Vec<_> = products.iter().filter(|p| query.matches(p)).collect();
        assert_eq!(filter(&products, &query).matches, expected);
    }

    #[test]
    fn test_catalog_from_json_validates() {
        let catalog = Catalog::from_json(
            r#"[{"id":"p1","title":"Lamp","category":"home-garden","price":"45.00","rating":4}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&ProductId::new("p1")).unwrap().title, "Lamp");

        assert!(
            Catalog::from_json(r#"[{"id":"p1","title":"x","category":"c","price":"1","rating":9}]"#)
                .is_err()
        );
        assert!(Catalog::from_json("{}").is_err());
    }

    #[test]
    fn test_results_label() {
        assert_eq!(results_label(1), "1 product found");
        assert_eq!(results_label(12), "12 products found");
    }
}
