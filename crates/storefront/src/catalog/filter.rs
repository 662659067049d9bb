//! Client-side filtering, sorting, and paging for catalog views.
//!
//! The catalog API has no combined filter endpoint, so list views fetch a
//! category (or the whole catalog) once and refine locally. These are pure
//! functions over a product slice; they never touch the network.

use serde::{Deserialize, Serialize};

use super::PRODUCTS_PER_PAGE;
use super::types::Product;

/// Sort orders offered by catalog views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Newest first (descending catalog id).
    #[default]
    Newest,
    /// Price: low to high.
    PriceAsc,
    /// Price: high to low.
    PriceDesc,
    /// Highest rated first.
    Rating,
}

/// A catalog view refinement: free-text search, category, sort order.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive match against title, description, category, brand.
    pub search: Option<String>,
    /// Restrict to one category slug; `None` means all.
    pub category: Option<String>,
    pub sort: SortKey,
}

impl ProductFilter {
    /// Whether this filter deviates from the default view.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.category.is_some()
            || self.sort != SortKey::Newest
    }

    /// Apply the filter to a product list, returning the refined view.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut filtered: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        sort_products(&mut filtered, self.sort);
        filtered
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && product.category != *category
        {
            return false;
        }

        let Some(query) = self.search.as_deref().map(str::trim) else {
            return true;
        };
        if query.is_empty() {
            return true;
        }

        let query = query.to_lowercase();
        product.title.to_lowercase().contains(&query)
            || product.description.to_lowercase().contains(&query)
            || product.category.to_lowercase().contains(&query)
            || product
                .brand
                .as_deref()
                .is_some_and(|b| b.to_lowercase().contains(&query))
    }
}

/// Sort a product list in place.
pub fn sort_products(products: &mut [Product], sort: SortKey) {
    match sort {
        SortKey::Newest => products.sort_by(|a, b| b.id.as_i64().cmp(&a.id.as_i64())),
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => {
            products.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));
        }
    }
}

/// One page of a refined product list (pages are 0-indexed).
#[must_use]
pub fn page(products: &[Product], index: usize) -> &[Product] {
    let start = index.saturating_mul(PRODUCTS_PER_PAGE);
    let end = start.saturating_add(PRODUCTS_PER_PAGE).min(products.len());
    products.get(start..end).unwrap_or(&[])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testutil::product;

    fn shelf() -> Vec<Product> {
        vec![
            product(1, "10", "0", 5),
            product(2, "30", "0", 5),
            product(3, "20", "0", 5),
        ]
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let filter = ProductFilter::default();
        let view = filter.apply(&shelf());
        let ids: Vec<i64> = view.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_by_price() {
        let ascending = ProductFilter {
            sort: SortKey::PriceAsc,
            ..Default::default()
        };
        let ids: Vec<i64> = ascending.apply(&shelf()).iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        let descending = ProductFilter {
            sort: SortKey::PriceDesc,
            ..Default::default()
        };
        let ids: Vec<i64> = descending.apply(&shelf()).iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_search_matches_title_case_insensitive() {
        let mut items = shelf();
        items[0].title = "Check Shirt".to_string();
        let filter = ProductFilter {
            search: Some("check".to_string()),
            ..Default::default()
        };
        let view = filter.apply(&items);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id.as_i64(), 1);
    }

    #[test]
    fn test_search_matches_brand() {
        let mut items = shelf();
        items[1].brand = Some("Fashion Trends".to_string());
        let filter = ProductFilter {
            search: Some("fashion".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&items).len(), 1);
    }

    #[test]
    fn test_category_filter() {
        let mut items = shelf();
        items[2].category = "mens-watches".to_string();
        let filter = ProductFilter {
            category: Some("mens-watches".to_string()),
            ..Default::default()
        };
        let view = filter.apply(&items);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id.as_i64(), 3);
    }

    #[test]
    fn test_blank_search_is_inactive() {
        let filter = ProductFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&shelf()).len(), 3);
    }

    #[test]
    fn test_paging() {
        let items: Vec<Product> = (1..=30).map(|i| product(i, "1", "0", 1)).collect();
        assert_eq!(page(&items, 0).len(), PRODUCTS_PER_PAGE);
        assert_eq!(page(&items, 2).len(), 30 - 2 * PRODUCTS_PER_PAGE);
        assert!(page(&items, 3).is_empty());
    }
}
