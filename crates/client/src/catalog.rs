//! Read-only product lookup built from a fetched product list.

use std::collections::HashMap;

use greenkart_core::{Product, ProductId};

/// Product catalog indexed by id.
///
/// Fetched once per screen lifetime and treated as immutable afterwards.
/// Unknown ids are simply absent from lookups - never an error - which is
/// what callers rely on while the catalog fetch is still in flight (an
/// empty catalog behaves like one that is missing every product).
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    by_id: HashMap<ProductId, Product>,
}

impl ProductCatalog {
    /// An empty catalog, as used before the fetch completes or after it
    /// fails.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.by_id.get(&id)
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterate over all products, in no particular order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.by_id.values()
    }
}

impl FromIterator<Product> for ProductCatalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self {
            by_id: iter.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

impl From<Vec<Product>> for ProductCatalog {
    fn from(products: Vec<Product>) -> Self {
        products.into_iter().collect()
    }
}
