// src/main.rs
use zap_admin::api::client::{Credentials, NewCustomer, NewOrder, NewProduct, NewUser};
use zap_admin::api::memory::InMemoryApi;
use zap_admin::config::Config;
use zap_admin::domain::errors::AppResult;
use zap_admin::domain::models::{Interaction, OrderItem, OrderStatus, PaymentMethod};
use zap_admin::effects;
use zap_admin::session::TokenStore;
use zap_admin::store::meta::{Filter, PaginationPatch};
use zap_admin::store::orders::{OrderFilterPatch, OrderStatisticsPatch};
use zap_admin::store::{self, CustomersIntent, Intent, OrdersIntent, ProductsIntent};

use chrono::Utc;
use rust_decimal_macros::dec;

/// Scripted walkthrough of the admin store against the in-memory backend:
/// the same intent traffic the console screens generate, end to end.
#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting zap_admin v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Backend at {}", config.api.base_url);

    let tokens = TokenStore::new(&config.session.token_path);
    let store = store::shared();

    // Restore a previous session, if one was persisted
    if let Some(token) = tokens.load()? {
        log::info!("Restoring persisted session");
        store.lock().unwrap().restore_token(token);
    }

    let client = InMemoryApi::new();

    // Register and log in
    effects::register(
        &store,
        &client,
        &NewUser {
            email: "dono@example.com".to_string(),
            password: "s3cret".to_string(),
            full_name: Some("Dono da Loja".to_string()),
            whatsapp_number: "+5511988887777".to_string(),
        },
    )
    .await;

    effects::login(
        &store,
        &client,
        &tokens,
        &Credentials {
            email: "dono@example.com".to_string(),
            password: "s3cret".to_string(),
        },
    )
    .await;
    log::info!(
        "Authenticated: {}",
        store.lock().unwrap().state().auth().is_authenticated()
    );

    // Stock the catalog
    for (name, price, stock) in [
        ("Camiseta Estampada", dec!(49.90), 12u32),
        ("Caneca Personalizada", dec!(29.90), 30),
    ] {
        effects::create_product(
            &store,
            &client,
            &NewProduct {
                name: name.to_string(),
                description: format!("{} feita sob encomenda", name),
                price,
                stock,
                image_url: String::new(),
                is_active: true,
            },
        )
        .await;
    }

    store
        .lock()
        .unwrap()
        .dispatch(Intent::Products(ProductsIntent::SetPagination(
            PaginationPatch {
                limit: Some(config.ui.page_size),
                ..Default::default()
            },
        )));
    effects::fetch_products(&store, &client).await;
    log::info!(
        "Catalog: {} products",
        store.lock().unwrap().state().products().products().len()
    );

    // A customer arrives over WhatsApp
    effects::create_customer(
        &store,
        &client,
        &NewCustomer {
            whatsapp_number: "+5511999990001".to_string(),
            name: "Maria Souza".to_string(),
            email: None,
        },
    )
    .await;
    let customer_id = store.lock().unwrap().state().customers().customers()[0].id;

    store
        .lock()
        .unwrap()
        .dispatch(Intent::Customers(CustomersIntent::RecordInteraction {
            customer_id,
            interaction: Interaction {
                timestamp: Utc::now(),
                kind: "message".to_string(),
                content: "Quero duas camisetas, por favor".to_string(),
            },
        }));

    // Place an order and then cancel it
    let product = store.lock().unwrap().state().products().products()[0].clone();
    effects::create_order(
        &store,
        &client,
        &NewOrder {
            customer_id,
            payment_method: PaymentMethod::Pix,
            items: vec![OrderItem {
                product_id: product.id,
                quantity: 2,
                unit_price: product.price,
            }],
        },
    )
    .await;

    let order = store.lock().unwrap().state().orders().orders()[0].clone();
    log::info!(
        "Order {} created: {} ({})",
        order.id,
        order.total_amount,
        order.status
    );

    effects::cancel_order(&store, &client, order.id).await;
    log::info!(
        "Order {} now {}",
        order.id,
        store.lock().unwrap().state().orders().orders()[0].status
    );

    // Narrow the listing to cancelled orders and refetch
    store
        .lock()
        .unwrap()
        .dispatch(Intent::Orders(OrdersIntent::SetFilters(OrderFilterPatch {
            status: Some(Filter::Only(OrderStatus::Cancelled)),
            ..Default::default()
        })));
    effects::fetch_orders(&store, &client).await;

    // Refresh the dashboard snapshot from what we fetched
    {
        let mut guard = store.lock().unwrap();
        let orders = guard.state().orders();
        let total_orders = orders.pagination().total;
        let total_revenue = orders.orders().iter().map(|o| o.total_amount).sum();
        guard.dispatch(Intent::Orders(OrdersIntent::UpdateStatistics(
            OrderStatisticsPatch {
                total_orders: Some(total_orders),
                total_revenue: Some(total_revenue),
                ..Default::default()
            },
        )));
    }

    let guard = store.lock().unwrap();
    let state = guard.state();
    log::info!(
        "Done: {} orders listed, {} customers, revenue {}",
        state.orders().orders().len(),
        state.customers().customers().len(),
        state.orders().statistics().total_revenue
    );

    Ok(())
}
