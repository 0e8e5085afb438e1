// src/api/memory.rs
use crate::api::client::{
    ApiClient, Credentials, CustomerPatch, ListQuery, LoginResponse, NewCustomer, NewOrder,
    NewProduct, NewUser, OrderPatch, Page, ProductPatch, ProfilePatch,
};
use crate::domain::errors::{ApiError, ApiResult};
use crate::domain::models::{Customer, Order, OrderStatus, PlanType, Product, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory stand-in for the backend, used by the demo binary and the
/// integration tests. Honors search/status filtering and paging the way
/// the real API does; ids are auto-incremented, listings newest-first.
#[derive(Default)]
pub struct InMemoryApi {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    passwords: HashMap<String, String>,
    current_user: Option<i64>,
    products: Vec<Product>,
    orders: Vec<Order>,
    customers: Vec<Customer>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }
}

fn in_range(created_at: DateTime<Utc>, query: &ListQuery) -> bool {
    if let Some(start) = query.start {
        if created_at < start {
            return false;
        }
    }
    if let Some(end) = query.end {
        if created_at > end {
            return false;
        }
    }
    true
}

fn paginate<T: Clone>(mut items: Vec<T>, query: &ListQuery) -> Page<T> {
    let total = items.len() as u64;
    let limit = query.limit.max(1) as usize;
    let offset = (query.page.max(1) as usize - 1) * limit;

    let items = if offset >= items.len() {
        Vec::new()
    } else {
        items.drain(offset..).take(limit).collect()
    };

    Page { items, total }
}

fn matches_search(haystacks: &[&str], query: &ListQuery) -> bool {
    match &query.search {
        None => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            haystacks
                .iter()
                .any(|h| h.to_lowercase().contains(&needle))
        }
    }
}

#[async_trait]
impl ApiClient for InMemoryApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let mut tables = self.tables.lock().unwrap();

        let known = tables
            .passwords
            .get(&credentials.email)
            .map(|p| p == &credentials.password)
            .unwrap_or(false);
        if !known {
            return Err(ApiError::Auth("invalid email or password".to_string()));
        }

        let user = tables
            .users
            .iter()
            .find(|u| u.email == credentials.email)
            .cloned()
            .ok_or_else(|| ApiError::Auth("invalid email or password".to_string()))?;

        tables.current_user = Some(user.id);
        Ok(LoginResponse {
            token: format!("mem-token-{}", user.id),
            user,
        })
    }

    async fn register(&self, new_user: &NewUser) -> ApiResult<User> {
        let mut tables = self.tables.lock().unwrap();

        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(ApiError::Api {
                status: 409,
                message: format!("email {} already registered", new_user.email),
            });
        }

        let user = User {
            id: tables.next_id(),
            email: new_user.email.clone(),
            full_name: new_user.full_name.clone(),
            whatsapp_number: new_user.whatsapp_number.clone(),
            plan_type: PlanType::Free,
            is_active: true,
            created_at: Utc::now(),
        };
        tables
            .passwords
            .insert(new_user.email.clone(), new_user.password.clone());
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(&self, patch: &ProfilePatch) -> ApiResult<User> {
        let mut tables = self.tables.lock().unwrap();

        let user_id = tables
            .current_user
            .ok_or_else(|| ApiError::Auth("not logged in".to_string()))?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| ApiError::NotFound(format!("user {}", user_id)))?;

        if let Some(full_name) = &patch.full_name {
            user.full_name = Some(full_name.clone());
        }
        if let Some(whatsapp_number) = &patch.whatsapp_number {
            user.whatsapp_number = whatsapp_number.clone();
        }
        if let Some(plan_type) = patch.plan_type {
            user.plan_type = plan_type;
        }
        Ok(user.clone())
    }

    async fn list_products(&self, query: &ListQuery) -> ApiResult<Page<Product>> {
        let tables = self.tables.lock().unwrap();

        let mut matching: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| matches_search(&[p.name.as_str(), p.description.as_str()], query))
            .filter(|p| match query.status.as_deref() {
                Some("active") => p.is_active,
                Some("inactive") => !p.is_active,
                _ => true,
            })
            .filter(|p| in_range(p.created_at, query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(paginate(matching, query))
    }

    async fn create_product(&self, new_product: &NewProduct) -> ApiResult<Product> {
        let mut tables = self.tables.lock().unwrap();

        let product = Product {
            id: tables.next_id(),
            name: new_product.name.clone(),
            description: new_product.description.clone(),
            price: new_product.price,
            stock: new_product.stock,
            image_url: new_product.image_url.clone(),
            is_active: new_product.is_active,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i64, patch: &ProductPatch) -> ApiResult<Product> {
        let mut tables = self.tables.lock().unwrap();

        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("product {}", id)))?;

        if let Some(name) = &patch.name {
            product.name = name.clone();
        }
        if let Some(description) = &patch.description {
            product.description = description.clone();
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(image_url) = &patch.image_url {
            product.image_url = image_url.clone();
        }
        if let Some(is_active) = patch.is_active {
            product.is_active = is_active;
        }
        product.updated_at = Some(Utc::now());
        Ok(product.clone())
    }

    async fn list_orders(&self, query: &ListQuery) -> ApiResult<Page<Order>> {
        let tables = self.tables.lock().unwrap();

        let mut matching: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| {
                matches_search(
                    &[o.customer.name.as_str(), o.customer.whatsapp_number.as_str()],
                    query,
                )
            })
            .filter(|o| match query.status.as_deref() {
                None => true,
                Some(status) => o.status.as_str() == status,
            })
            .filter(|o| match query.payment_method.as_deref() {
                None => true,
                Some(method) => o.payment_method.as_str() == method,
            })
            .filter(|o| in_range(o.created_at, query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(paginate(matching, query))
    }

    async fn create_order(&self, new_order: &NewOrder) -> ApiResult<Order> {
        let mut tables = self.tables.lock().unwrap();

        let customer = tables
            .customers
            .iter()
            .find(|c| c.id == new_order.customer_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("customer {}", new_order.customer_id)))?;

        let total_amount = new_order
            .items
            .iter()
            .map(|item| item.unit_price * rust_decimal::Decimal::from(item.quantity))
            .sum();

        let order = Order {
            id: tables.next_id(),
            customer,
            status: OrderStatus::Pending,
            total_amount,
            payment_method: new_order.payment_method,
            payment_id: None,
            items: new_order.items.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn update_order(&self, id: i64, patch: &OrderPatch) -> ApiResult<Order> {
        let mut tables = self.tables.lock().unwrap();

        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("order {}", id)))?;

        if let Some(status) = patch.status {
            if !order.status.can_transition_to(status) {
                return Err(ApiError::Api {
                    status: 409,
                    message: format!(
                        "cannot change order {} from {} to {}",
                        id, order.status, status
                    ),
                });
            }
            order.status = status;
        }
        if let Some(payment_id) = &patch.payment_id {
            order.payment_id = Some(payment_id.clone());
        }
        order.updated_at = Some(Utc::now());
        Ok(order.clone())
    }

    async fn cancel_order(&self, id: i64) -> ApiResult<Order> {
        let mut tables = self.tables.lock().unwrap();

        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("order {}", id)))?;

        if order.status.is_terminal() {
            return Err(ApiError::Api {
                status: 409,
                message: format!("order {} is already {}", id, order.status),
            });
        }
        order.status = OrderStatus::Cancelled;
        order.updated_at = Some(Utc::now());
        Ok(order.clone())
    }

    async fn list_customers(&self, query: &ListQuery) -> ApiResult<Page<Customer>> {
        let tables = self.tables.lock().unwrap();

        let mut matching: Vec<Customer> = tables
            .customers
            .iter()
            .filter(|c| matches_search(&[c.name.as_str(), c.whatsapp_number.as_str()], query))
            .filter(|c| match query.status.as_deref() {
                Some("active") => c.last_interaction.is_some(),
                Some("inactive") => c.last_interaction.is_none(),
                _ => true,
            })
            .filter(|c| in_range(c.created_at, query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(paginate(matching, query))
    }

    async fn create_customer(&self, new_customer: &NewCustomer) -> ApiResult<Customer> {
        let mut tables = self.tables.lock().unwrap();

        let customer = Customer {
            id: tables.next_id(),
            whatsapp_number: new_customer.whatsapp_number.clone(),
            name: new_customer.name.clone(),
            email: new_customer.email.clone(),
            interaction_history: Vec::new(),
            last_interaction: None,
            created_at: Utc::now(),
        };
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    async fn update_customer(&self, id: i64, patch: &CustomerPatch) -> ApiResult<Customer> {
        let mut tables = self.tables.lock().unwrap();

        let customer = tables
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("customer {}", id)))?;

        if let Some(name) = &patch.name {
            customer.name = name.clone();
        }
        if let Some(email) = &patch.email {
            customer.email = Some(email.clone());
        }
        Ok(customer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::OrderItem;
    use rust_decimal_macros::dec;

    async fn api_with_customer() -> (InMemoryApi, Customer) {
        let api = InMemoryApi::new();
        let customer = api
            .create_customer(&NewCustomer {
                whatsapp_number: "+5511999990001".to_string(),
                name: "Cliente Teste".to_string(),
                email: None,
            })
            .await
            .unwrap();
        (api, customer)
    }

    #[tokio::test]
    async fn order_total_is_derived_from_items() {
        let (api, customer) = api_with_customer().await;

        let order = api
            .create_order(&NewOrder {
                customer_id: customer.id,
                payment_method: crate::domain::models::PaymentMethod::Pix,
                items: vec![
                    OrderItem {
                        product_id: 1,
                        quantity: 2,
                        unit_price: dec!(10),
                    },
                    OrderItem {
                        product_id: 2,
                        quantity: 1,
                        unit_price: dec!(5.50),
                    },
                ],
            })
            .await
            .unwrap();

        assert_eq!(order.total_amount, dec!(25.50));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn cancelling_a_cancelled_order_is_a_conflict() {
        let (api, customer) = api_with_customer().await;
        let order = api
            .create_order(&NewOrder {
                customer_id: customer.id,
                payment_method: crate::domain::models::PaymentMethod::Cash,
                items: Vec::new(),
            })
            .await
            .unwrap();

        api.cancel_order(order.id).await.unwrap();
        let err = api.cancel_order(order.id).await.unwrap_err();

        assert!(matches!(err, ApiError::Api { status: 409, .. }));
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_paged() {
        let api = InMemoryApi::new();
        for i in 0..5 {
            api.create_product(&NewProduct {
                name: format!("Produto {}", i),
                description: "Uma descrição suficientemente longa".to_string(),
                price: dec!(10),
                stock: 1,
                image_url: String::new(),
                is_active: true,
            })
            .await
            .unwrap();
        }

        let query = ListQuery {
            page: 1,
            limit: 2,
            ..Default::default()
        };
        let page = api.list_products(&query).await.unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert!(page.items[0].id > page.items[1].id);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let api = InMemoryApi::new();
        let new_user = NewUser {
            email: "dono@example.com".to_string(),
            password: "s3cret".to_string(),
            full_name: None,
            whatsapp_number: "+5511988887777".to_string(),
        };

        api.register(&new_user).await.unwrap();
        let err = api.register(&new_user).await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 409, .. }));
    }
}
