//! Product repositories feeding the scoring engine

use crate::types::ProductRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

const DEMO_CATALOG: &str = include_str!("../data/demo_catalog.json");

/// Source of product records. The scoring core never reaches for a global
/// catalog; whatever implements this is handed to the engine.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_product(&self, id: &str) -> Result<Option<ProductRecord>>;

    async fn list_category(&self, category_id: &str) -> Result<Vec<ProductRecord>>;
}

/// Catalog held in memory, loaded once from JSON
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<String, ProductRecord>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let products: Vec<ProductRecord> = serde_json::from_str(json).context("invalid product catalog")?;
        Ok(Self::new(products))
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let catalog = Self::from_json(&json)?;
        info!("Loaded {} products from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Catalog bundled with the crate
    pub fn demo() -> Result<Self> {
        Self::from_json(DEMO_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn insert(&mut self, product: ProductRecord) {
        self.products.insert(product.id.clone(), product);
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    fn name(&self) -> &'static str {
        "in_memory"
    }

    async fn get_product(&self, id: &str) -> Result<Option<ProductRecord>> {
        Ok(self.products.get(id).cloned())
    }

    async fn list_category(&self, category_id: &str) -> Result<Vec<ProductRecord>> {
        let mut products: Vec<ProductRecord> = self
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawValue;

    #[test]
    fn test_demo_catalog_loads() {
        let catalog = InMemoryCatalog::demo().unwrap();
        assert_eq!(catalog.len(), 11);

        let qn90c = tokio_test::block_on(catalog.get_product("samsung-qn90c-65"))
            .unwrap()
            .unwrap();
        assert_eq!(qn90c.category_id, "tv");
        assert_eq!(qn90c.specs.get("panel_type"), Some(&RawValue::Text("Mini-LED".into())));
        assert_eq!(qn90c.specs.get("pwm_dimming"), Some(&RawValue::Bool(false)));
    }

    #[test]
    fn test_list_category_is_sorted() {
        let catalog = InMemoryCatalog::demo().unwrap();
        let tvs = tokio_test::block_on(catalog.list_category("tv")).unwrap();

        assert_eq!(tvs.len(), 3);
        let ids: Vec<&str> = tvs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["lg-oled-c3-55", "samsung-qn90c-65", "tcl-qled-c645-55"]);
        assert!(tokio_test::block_on(catalog.list_category("toaster")).unwrap().is_empty());
    }

    #[test]
    fn test_missing_product_is_none() {
        let catalog = InMemoryCatalog::default();
        assert!(tokio_test::block_on(catalog.get_product("nope")).unwrap().is_none());
    }

    #[test]
    fn test_null_specs_are_missing() {
        let json = r#"[{"id":"p","categoryId":"tv","brand":"X","price":1,"specs":{"input_lag_ms":null}}]"#;
        let catalog = InMemoryCatalog::from_json(json).unwrap();
        let p = tokio_test::block_on(catalog.get_product("p")).unwrap().unwrap();
        assert!(p.specs["input_lag_ms"].is_missing());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(InMemoryCatalog::from_json("{not json").is_err());
    }
}
