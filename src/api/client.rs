// src/api/client.rs
use crate::domain::errors::ApiResult;
use crate::domain::models::{
    Customer, Order, OrderItem, OrderStatus, PaymentMethod, PlanType, Product, User,
};
use crate::store::customers::CustomerFilters;
use crate::store::meta::Pagination;
use crate::store::orders::OrderFilters;
use crate::store::products::ProductFilters;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One page of a listing plus the server-side row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Query parameters for the list endpoints. Filters are forwarded verbatim;
/// the backend applies them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub page: u32,
    pub limit: u32,
}

impl ListQuery {
    pub fn from_products(filters: &ProductFilters, pagination: &Pagination) -> Self {
        Self {
            search: non_empty(&filters.search),
            status: filters.status.as_option().map(|s| s.as_str().to_string()),
            payment_method: None,
            start: filters.date_range.start,
            end: filters.date_range.end,
            page: pagination.page,
            limit: pagination.limit,
        }
    }

    pub fn from_orders(filters: &OrderFilters, pagination: &Pagination) -> Self {
        Self {
            search: non_empty(&filters.search),
            status: filters.status.as_option().map(|s| s.as_str().to_string()),
            payment_method: filters
                .payment_method
                .as_option()
                .map(|m| m.as_str().to_string()),
            start: filters.date_range.start,
            end: filters.date_range.end,
            page: pagination.page,
            limit: pagination.limit,
        }
    }

    pub fn from_customers(filters: &CustomerFilters, pagination: &Pagination) -> Self {
        Self {
            search: non_empty(&filters.search),
            status: filters.status.as_option().map(|s| s.as_str().to_string()),
            payment_method: None,
            start: filters.date_range.start,
            end: filters.date_range.end,
            page: pagination.page,
            limit: pagination.limit,
        }
    }
}

fn non_empty(search: &str) -> Option<String> {
    let trimmed = search.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Request payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub whatsapp_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub plan_type: Option<PlanType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    pub image_url: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub whatsapp_number: String,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: i64,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub payment_id: Option<String>,
}

/// Backend collaborator interface. Implementations own transport and
/// authentication; callers only see typed payloads and `ApiError`.
#[async_trait]
pub trait ApiClient: Send + Sync {
    // Auth
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse>;
    async fn register(&self, new_user: &NewUser) -> ApiResult<User>;
    async fn update_profile(&self, patch: &ProfilePatch) -> ApiResult<User>;

    // Products
    async fn list_products(&self, query: &ListQuery) -> ApiResult<Page<Product>>;
    async fn create_product(&self, new_product: &NewProduct) -> ApiResult<Product>;
    async fn update_product(&self, id: i64, patch: &ProductPatch) -> ApiResult<Product>;

    // Orders
    async fn list_orders(&self, query: &ListQuery) -> ApiResult<Page<Order>>;
    async fn create_order(&self, new_order: &NewOrder) -> ApiResult<Order>;
    async fn update_order(&self, id: i64, patch: &OrderPatch) -> ApiResult<Order>;
    async fn cancel_order(&self, id: i64) -> ApiResult<Order>;

    // Customers
    async fn list_customers(&self, query: &ListQuery) -> ApiResult<Page<Customer>>;
    async fn create_customer(&self, new_customer: &NewCustomer) -> ApiResult<Customer>;
    async fn update_customer(&self, id: i64, patch: &CustomerPatch) -> ApiResult<Customer>;
}
