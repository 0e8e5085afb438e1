// src/effects.rs
//! Bridges between the backend collaborator and the store. Every remote
//! operation follows the same bracket: dispatch the Start intent while
//! holding the lock, release it across the await, then dispatch the
//! Success/Failure completion. The store itself never suspends.

use crate::api::client::{
    ApiClient, Credentials, CustomerPatch, ListQuery, NewCustomer, NewOrder, NewProduct, NewUser,
    OrderPatch, ProductPatch, ProfilePatch,
};
use crate::session::TokenStore;
use crate::store::{
    AuthIntent, CustomersIntent, Intent, OrdersIntent, ProductsIntent, SharedStore,
};

// Auth

pub async fn login<C: ApiClient>(
    store: &SharedStore,
    client: &C,
    tokens: &TokenStore,
    credentials: &Credentials,
) {
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Auth(AuthIntent::LoginStart));

    let intent = match client.login(credentials).await {
        Ok(response) => {
            if let Err(e) = tokens.save(&response.token) {
                // Session stays usable in memory; it just won't survive a restart
                log::warn!("failed to persist session token: {}", e);
            }
            AuthIntent::LoginSuccess {
                token: response.token,
                user: response.user,
            }
        }
        Err(e) => AuthIntent::LoginFailure(e.to_string()),
    };
    store.lock().unwrap().dispatch(Intent::Auth(intent));
}

pub async fn register<C: ApiClient>(store: &SharedStore, client: &C, new_user: &NewUser) {
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Auth(AuthIntent::RegisterStart));

    let intent = match client.register(new_user).await {
        Ok(user) => AuthIntent::RegisterSuccess(user),
        Err(e) => AuthIntent::RegisterFailure(e.to_string()),
    };
    store.lock().unwrap().dispatch(Intent::Auth(intent));
}

pub async fn update_profile<C: ApiClient>(store: &SharedStore, client: &C, patch: &ProfilePatch) {
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Auth(AuthIntent::ProfileUpdateStart));

    let intent = match client.update_profile(patch).await {
        Ok(user) => AuthIntent::ProfileUpdateSuccess(user),
        Err(e) => AuthIntent::ProfileUpdateFailure(e.to_string()),
    };
    store.lock().unwrap().dispatch(Intent::Auth(intent));
}

/// Clear both the durable token slot and the in-memory session.
pub fn logout(store: &SharedStore, tokens: &TokenStore) {
    if let Err(e) = tokens.clear() {
        log::warn!("failed to clear session token: {}", e);
    }
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Auth(AuthIntent::Logout));
}

// Products

pub async fn fetch_products<C: ApiClient>(store: &SharedStore, client: &C) {
    let (fetch_id, query) = {
        let mut store = store.lock().unwrap();
        store.dispatch(Intent::Products(ProductsIntent::FetchStart));
        let state = store.state().products();
        (
            state.last_fetch_id(),
            ListQuery::from_products(state.filters(), state.pagination()),
        )
    };

    let intent = match client.list_products(&query).await {
        Ok(page) => ProductsIntent::FetchSuccess {
            fetch_id,
            products: page.items,
            total: page.total,
        },
        Err(e) => ProductsIntent::FetchFailure {
            fetch_id,
            message: e.to_string(),
        },
    };
    store.lock().unwrap().dispatch(Intent::Products(intent));
}

pub async fn create_product<C: ApiClient>(store: &SharedStore, client: &C, new: &NewProduct) {
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Products(ProductsIntent::CreateStart));

    let intent = match client.create_product(new).await {
        Ok(product) => ProductsIntent::CreateSuccess(product),
        Err(e) => ProductsIntent::CreateFailure(e.to_string()),
    };
    store.lock().unwrap().dispatch(Intent::Products(intent));
}

pub async fn update_product<C: ApiClient>(
    store: &SharedStore,
    client: &C,
    id: i64,
    patch: &ProductPatch,
) {
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Products(ProductsIntent::UpdateStart));

    let intent = match client.update_product(id, patch).await {
        Ok(product) => ProductsIntent::UpdateSuccess(product),
        Err(e) => ProductsIntent::UpdateFailure(e.to_string()),
    };
    store.lock().unwrap().dispatch(Intent::Products(intent));
}

// Orders

pub async fn fetch_orders<C: ApiClient>(store: &SharedStore, client: &C) {
    let (fetch_id, query) = {
        let mut store = store.lock().unwrap();
        store.dispatch(Intent::Orders(OrdersIntent::FetchStart));
        let state = store.state().orders();
        (
            state.last_fetch_id(),
            ListQuery::from_orders(state.filters(), state.pagination()),
        )
    };

    let intent = match client.list_orders(&query).await {
        Ok(page) => OrdersIntent::FetchSuccess {
            fetch_id,
            orders: page.items,
            total: page.total,
        },
        Err(e) => OrdersIntent::FetchFailure {
            fetch_id,
            message: e.to_string(),
        },
    };
    store.lock().unwrap().dispatch(Intent::Orders(intent));
}

pub async fn create_order<C: ApiClient>(store: &SharedStore, client: &C, new: &NewOrder) {
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Orders(OrdersIntent::CreateStart));

    let intent = match client.create_order(new).await {
        Ok(order) => OrdersIntent::CreateSuccess(order),
        Err(e) => OrdersIntent::CreateFailure(e.to_string()),
    };
    store.lock().unwrap().dispatch(Intent::Orders(intent));
}

pub async fn update_order<C: ApiClient>(
    store: &SharedStore,
    client: &C,
    id: i64,
    patch: &OrderPatch,
) {
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Orders(OrdersIntent::UpdateStart));

    let intent = match client.update_order(id, patch).await {
        Ok(order) => OrdersIntent::UpdateSuccess(order),
        Err(e) => OrdersIntent::UpdateFailure(e.to_string()),
    };
    store.lock().unwrap().dispatch(Intent::Orders(intent));
}

pub async fn cancel_order<C: ApiClient>(store: &SharedStore, client: &C, id: i64) {
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Orders(OrdersIntent::CancelStart));

    let intent = match client.cancel_order(id).await {
        Ok(order) => OrdersIntent::CancelSuccess { id: order.id },
        Err(e) => OrdersIntent::CancelFailure(e.to_string()),
    };
    store.lock().unwrap().dispatch(Intent::Orders(intent));
}

// Customers

pub async fn fetch_customers<C: ApiClient>(store: &SharedStore, client: &C) {
    let (fetch_id, query) = {
        let mut store = store.lock().unwrap();
        store.dispatch(Intent::Customers(CustomersIntent::FetchStart));
        let state = store.state().customers();
        (
            state.last_fetch_id(),
            ListQuery::from_customers(state.filters(), state.pagination()),
        )
    };

    let intent = match client.list_customers(&query).await {
        Ok(page) => CustomersIntent::FetchSuccess {
            fetch_id,
            customers: page.items,
            total: page.total,
        },
        Err(e) => CustomersIntent::FetchFailure {
            fetch_id,
            message: e.to_string(),
        },
    };
    store.lock().unwrap().dispatch(Intent::Customers(intent));
}

pub async fn create_customer<C: ApiClient>(store: &SharedStore, client: &C, new: &NewCustomer) {
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Customers(CustomersIntent::CreateStart));

    let intent = match client.create_customer(new).await {
        Ok(customer) => CustomersIntent::CreateSuccess(customer),
        Err(e) => CustomersIntent::CreateFailure(e.to_string()),
    };
    store.lock().unwrap().dispatch(Intent::Customers(intent));
}

pub async fn update_customer<C: ApiClient>(
    store: &SharedStore,
    client: &C,
    id: i64,
    patch: &CustomerPatch,
) {
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Customers(CustomersIntent::UpdateStart));

    let intent = match client.update_customer(id, patch).await {
        Ok(customer) => CustomersIntent::UpdateSuccess(customer),
        Err(e) => CustomersIntent::UpdateFailure(e.to_string()),
    };
    store.lock().unwrap().dispatch(Intent::Customers(intent));
}
