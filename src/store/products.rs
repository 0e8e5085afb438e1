// src/store/products.rs
use crate::domain::models::Product;
use crate::store::meta::{DateRange, Filter, Pagination, PaginationPatch};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Listing filter for the catalog, matched against name/description by the
/// backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub search: String,
    pub status: Filter<ProductStatus>,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilterPatch {
    pub search: Option<String>,
    pub status: Option<Filter<ProductStatus>>,
    pub date_range: Option<DateRange>,
}

impl ProductFilters {
    fn apply(&mut self, patch: ProductFilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(date_range) = patch.date_range {
            self.date_range = date_range;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductStatistics {
    pub total_products: u64,
    pub active_products: u64,
    pub out_of_stock: u64,
    pub stock_value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductStatisticsPatch {
    pub total_products: Option<u64>,
    pub active_products: Option<u64>,
    pub out_of_stock: Option<u64>,
    pub stock_value: Option<Decimal>,
}

impl ProductStatistics {
    fn apply(&mut self, patch: ProductStatisticsPatch) {
        if let Some(total_products) = patch.total_products {
            self.total_products = total_products;
        }
        if let Some(active_products) = patch.active_products {
            self.active_products = active_products;
        }
        if let Some(out_of_stock) = patch.out_of_stock {
            self.out_of_stock = out_of_stock;
        }
        if let Some(stock_value) = patch.stock_value {
            self.stock_value = stock_value;
        }
    }
}

/// State transition requests for the products slice.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductsIntent {
    FetchStart,
    FetchSuccess {
        fetch_id: u64,
        products: Vec<Product>,
        total: u64,
    },
    FetchFailure {
        fetch_id: u64,
        message: String,
    },
    CreateStart,
    CreateSuccess(Product),
    CreateFailure(String),
    UpdateStart,
    UpdateSuccess(Product),
    UpdateFailure(String),
    SetSelected(Option<Product>),
    SetFilters(ProductFilterPatch),
    SetPagination(PaginationPatch),
    UpdateStatistics(ProductStatisticsPatch),
    ClearError,
}

/// Products slice: the catalog collection plus its request metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductsState {
    products: Vec<Product>,
    loading: bool,
    error: Option<String>,
    selected: Option<Product>,
    filters: ProductFilters,
    pagination: Pagination,
    statistics: ProductStatistics,
    last_fetch_id: u64,
}

impl ProductsState {
    // Selectors
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    pub fn filters(&self) -> &ProductFilters {
        &self.filters
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn statistics(&self) -> &ProductStatistics {
        &self.statistics
    }

    pub fn last_fetch_id(&self) -> u64 {
        self.last_fetch_id
    }

    pub(crate) fn reduce(&mut self, intent: ProductsIntent) {
        match intent {
            ProductsIntent::FetchStart => {
                self.last_fetch_id += 1;
                self.loading = true;
                self.error = None;
            }
            ProductsIntent::FetchSuccess {
                fetch_id,
                products,
                total,
            } => {
                if fetch_id != self.last_fetch_id {
                    log::debug!(
                        "ignoring stale products fetch {} (current {})",
                        fetch_id,
                        self.last_fetch_id
                    );
                    return;
                }
                self.loading = false;
                self.products = products;
                self.pagination.total = total;
            }
            ProductsIntent::FetchFailure { fetch_id, message } => {
                if fetch_id != self.last_fetch_id {
                    return;
                }
                self.loading = false;
                self.error = Some(message);
            }
            ProductsIntent::CreateStart | ProductsIntent::UpdateStart => {
                self.loading = true;
                self.error = None;
            }
            ProductsIntent::CreateSuccess(product) => {
                self.loading = false;
                self.products.insert(0, product);
            }
            ProductsIntent::UpdateSuccess(product) => {
                self.loading = false;
                if let Some(index) = self.products.iter().position(|p| p.id == product.id) {
                    self.products[index] = product;
                }
            }
            ProductsIntent::CreateFailure(message) | ProductsIntent::UpdateFailure(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            ProductsIntent::SetSelected(product) => {
                self.selected = product;
            }
            ProductsIntent::SetFilters(patch) => {
                self.filters.apply(patch);
                self.pagination.reset_page();
            }
            ProductsIntent::SetPagination(patch) => {
                self.pagination.apply(patch);
            }
            ProductsIntent::UpdateStatistics(patch) => {
                self.statistics.apply(patch);
            }
            ProductsIntent::ClearError => {
                self.error = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_product(id: i64) -> Product {
        Product {
            id,
            name: format!("Produto {}", id),
            description: "Descrição de teste com tamanho válido".to_string(),
            price: dec!(19.90),
            stock: 5,
            image_url: "https://example.com/p.png".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn state_with(products: Vec<Product>) -> ProductsState {
        let mut state = ProductsState::default();
        state.reduce(ProductsIntent::FetchStart);
        let fetch_id = state.last_fetch_id();
        state.reduce(ProductsIntent::FetchSuccess {
            fetch_id,
            total: products.len() as u64,
            products,
        });
        state
    }

    #[test]
    fn fetch_success_is_authoritative() {
        let mut state = state_with(vec![sample_product(1), sample_product(2)]);

        state.reduce(ProductsIntent::FetchStart);
        let fetch_id = state.last_fetch_id();
        state.reduce(ProductsIntent::FetchSuccess {
            fetch_id,
            products: vec![sample_product(3)],
            total: 1,
        });

        assert_eq!(state.products().len(), 1);
        assert_eq!(state.products()[0].id, 3);
        assert_eq!(state.pagination().total, 1);
    }

    #[test]
    fn stale_fetch_is_ignored() {
        let mut state = ProductsState::default();
        state.reduce(ProductsIntent::FetchStart);
        let stale = state.last_fetch_id();
        state.reduce(ProductsIntent::FetchStart);
        let fresh = state.last_fetch_id();

        state.reduce(ProductsIntent::FetchSuccess {
            fetch_id: fresh,
            products: vec![sample_product(2)],
            total: 1,
        });
        state.reduce(ProductsIntent::FetchSuccess {
            fetch_id: stale,
            products: vec![sample_product(1)],
            total: 9,
        });

        assert_eq!(state.products()[0].id, 2);
        assert_eq!(state.pagination().total, 1);
    }

    #[test]
    fn create_success_prepends() {
        let mut state = state_with(vec![sample_product(1)]);
        state.reduce(ProductsIntent::CreateSuccess(sample_product(2)));

        let ids: Vec<i64> = state.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(!state.loading());
    }

    #[test]
    fn update_success_replaces_by_id() {
        let mut state = state_with(vec![sample_product(1), sample_product(2)]);

        let mut updated = sample_product(1);
        updated.stock = 0;
        state.reduce(ProductsIntent::UpdateSuccess(updated));

        assert_eq!(state.products()[0].stock, 0);
        assert_eq!(state.products()[1].id, 2);
    }

    #[test]
    fn update_with_unknown_id_is_a_noop() {
        let mut state = state_with(vec![sample_product(1)]);
        let before = state.products().to_vec();

        state.reduce(ProductsIntent::UpdateSuccess(sample_product(7)));

        assert_eq!(state.products(), &before[..]);
    }

    #[test]
    fn set_filters_resets_page() {
        let mut state = ProductsState::default();
        state.reduce(ProductsIntent::SetPagination(PaginationPatch {
            page: Some(4),
            ..Default::default()
        }));

        state.reduce(ProductsIntent::SetFilters(ProductFilterPatch {
            status: Some(Filter::Only(ProductStatus::Inactive)),
            ..Default::default()
        }));

        assert_eq!(state.pagination().page, 1);
    }

    #[test]
    fn failure_records_message_and_stops_loading() {
        let mut state = ProductsState::default();
        state.reduce(ProductsIntent::CreateStart);
        state.reduce(ProductsIntent::CreateFailure("stock must be >= 0".to_string()));

        assert!(!state.loading());
        assert_eq!(state.error(), Some("stock must be >= 0"));

        state.reduce(ProductsIntent::ClearError);
        assert_eq!(state.error(), None);
    }
}
