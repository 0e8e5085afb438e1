// src/store/mod.rs
pub mod auth;
pub mod customers;
pub mod meta;
pub mod orders;
pub mod products;

use std::sync::{Arc, Mutex};

pub use auth::{AuthIntent, AuthState};
pub use customers::{CustomersIntent, CustomersState};
pub use orders::{OrdersIntent, OrdersState};
pub use products::{ProductsIntent, ProductsState};

/// A state transition request for one of the slices.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Auth(AuthIntent),
    Products(ProductsIntent),
    Orders(OrdersIntent),
    Customers(CustomersIntent),
}

/// The aggregate state tree: the direct product of the four slice states.
/// No cross-slice invariant is enforced; an order's embedded customer
/// snapshot may diverge from the customers collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    auth: AuthState,
    products: ProductsState,
    orders: OrdersState,
    customers: CustomersState,
}

impl AppState {
    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn products(&self) -> &ProductsState {
        &self.products
    }

    pub fn orders(&self) -> &OrdersState {
        &self.orders
    }

    pub fn customers(&self) -> &CustomersState {
        &self.customers
    }
}

/// Exclusive owner of the state tree. All mutation funnels through
/// `dispatch`, which borrows the store mutably, so intents are serialized
/// by construction and readers never observe a half-applied transition.
#[derive(Debug, Default)]
pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only snapshot of the current tree.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply one intent to its slice.
    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::Auth(intent) => self.state.auth.reduce(intent),
            Intent::Products(intent) => self.state.products.reduce(intent),
            Intent::Orders(intent) => self.state.orders.reduce(intent),
            Intent::Customers(intent) => self.state.customers.reduce(intent),
        }
    }

    /// Apply a batch in order. Equivalent to dispatching one at a time.
    pub fn dispatch_all<I>(&mut self, intents: I)
    where
        I: IntoIterator<Item = Intent>,
    {
        for intent in intents {
            self.dispatch(intent);
        }
    }

    /// Seed the auth slice with a token persisted by a previous session.
    pub fn restore_token(&mut self, token: String) {
        self.state.auth.restore_token(token);
    }
}

/// Handle shared between the view layer and the async effects.
pub type SharedStore = Arc<Mutex<Store>>;

pub fn shared() -> SharedStore {
    Arc::new(Mutex::new(Store::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::meta::PaginationPatch;
    use crate::store::orders::OrderFilterPatch;

    #[test]
    fn intents_only_touch_their_slice() {
        let mut store = Store::new();

        store.dispatch(Intent::Orders(OrdersIntent::FetchStart));

        assert!(store.state().orders().loading());
        assert!(!store.state().products().loading());
        assert!(!store.state().customers().loading());
        assert!(!store.state().auth().loading());
    }

    #[test]
    fn dispatch_all_matches_sequential_dispatch() {
        let batch = vec![
            Intent::Orders(OrdersIntent::SetPagination(PaginationPatch {
                page: Some(3),
                ..Default::default()
            })),
            Intent::Orders(OrdersIntent::SetFilters(OrderFilterPatch {
                search: Some("pix".to_string()),
                ..Default::default()
            })),
            Intent::Customers(CustomersIntent::FetchStart),
            Intent::Auth(AuthIntent::LoginStart),
        ];

        let mut sequential = Store::new();
        for intent in batch.clone() {
            sequential.dispatch(intent);
        }

        let mut batched = Store::new();
        batched.dispatch_all(batch);

        assert_eq!(sequential.state(), batched.state());
    }

    #[test]
    fn restored_token_is_visible_through_selectors() {
        let mut store = Store::new();
        store.restore_token("persisted".to_string());

        assert!(store.state().auth().is_authenticated());
    }
}
