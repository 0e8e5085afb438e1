// src/store/orders.rs
use crate::domain::models::{Order, OrderStatus, PaymentMethod};
use crate::store::meta::{DateRange, Filter, Pagination, PaginationPatch};
use rust_decimal::Decimal;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Client-side filter intent for the orders listing. Forwarded to the data
/// source as query parameters, never applied locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilters {
    pub search: String,
    pub status: Filter<OrderStatus>,
    pub date_range: DateRange,
    pub payment_method: Filter<PaymentMethod>,
}

/// Partial filter update. Present fields replace, absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilterPatch {
    pub search: Option<String>,
    pub status: Option<Filter<OrderStatus>>,
    pub date_range: Option<DateRange>,
    pub payment_method: Option<Filter<PaymentMethod>>,
}

impl OrderFilters {
    fn apply(&mut self, patch: OrderFilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(date_range) = patch.date_range {
            self.date_range = date_range;
        }
        if let Some(payment_method) = patch.payment_method {
            self.payment_method = payment_method;
        }
    }
}

/// Last-known-good aggregate snapshot for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderStatistics {
    pub total_orders: u64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub orders_by_status: HashMap<OrderStatus, u64>,
    pub revenue_by_day: Vec<DailyRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderStatisticsPatch {
    pub total_orders: Option<u64>,
    pub total_revenue: Option<Decimal>,
    pub average_order_value: Option<Decimal>,
    pub orders_by_status: Option<HashMap<OrderStatus, u64>>,
    pub revenue_by_day: Option<Vec<DailyRevenue>>,
}

impl OrderStatistics {
    fn apply(&mut self, patch: OrderStatisticsPatch) {
        if let Some(total_orders) = patch.total_orders {
            self.total_orders = total_orders;
        }
        if let Some(total_revenue) = patch.total_revenue {
            self.total_revenue = total_revenue;
        }
        if let Some(average_order_value) = patch.average_order_value {
            self.average_order_value = average_order_value;
        }
        if let Some(orders_by_status) = patch.orders_by_status {
            self.orders_by_status = orders_by_status;
        }
        if let Some(revenue_by_day) = patch.revenue_by_day {
            self.revenue_by_day = revenue_by_day;
        }
    }
}

/// State transition requests for the orders slice.
#[derive(Debug, Clone, PartialEq)]
pub enum OrdersIntent {
    FetchStart,
    FetchSuccess {
        fetch_id: u64,
        orders: Vec<Order>,
        total: u64,
    },
    FetchFailure {
        fetch_id: u64,
        message: String,
    },
    CreateStart,
    CreateSuccess(Order),
    CreateFailure(String),
    UpdateStart,
    UpdateSuccess(Order),
    UpdateFailure(String),
    CancelStart,
    CancelSuccess {
        id: i64,
    },
    CancelFailure(String),
    SetSelected(Option<Order>),
    SetFilters(OrderFilterPatch),
    SetPagination(PaginationPatch),
    UpdateStatistics(OrderStatisticsPatch),
    ClearError,
}

/// Orders slice: the order collection plus its request metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersState {
    orders: Vec<Order>,
    loading: bool,
    error: Option<String>,
    selected: Option<Order>,
    filters: OrderFilters,
    pagination: Pagination,
    statistics: OrderStatistics,
    last_fetch_id: u64,
}

impl OrdersState {
    // Selectors
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&Order> {
        self.selected.as_ref()
    }

    pub fn filters(&self) -> &OrderFilters {
        &self.filters
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn statistics(&self) -> &OrderStatistics {
        &self.statistics
    }

    /// Id of the most recently issued fetch. A completion intent carrying
    /// any other id is stale and ignored.
    pub fn last_fetch_id(&self) -> u64 {
        self.last_fetch_id
    }

    pub(crate) fn reduce(&mut self, intent: OrdersIntent) {
        match intent {
            OrdersIntent::FetchStart => {
                self.last_fetch_id += 1;
                self.loading = true;
                self.error = None;
            }
            OrdersIntent::FetchSuccess {
                fetch_id,
                orders,
                total,
            } => {
                if fetch_id != self.last_fetch_id {
                    log::debug!(
                        "ignoring stale orders fetch {} (current {})",
                        fetch_id,
                        self.last_fetch_id
                    );
                    return;
                }
                self.loading = false;
                // The server is authoritative for listings: replace, never merge
                self.orders = orders;
                self.pagination.total = total;
            }
            OrdersIntent::FetchFailure { fetch_id, message } => {
                if fetch_id != self.last_fetch_id {
                    return;
                }
                self.loading = false;
                self.error = Some(message);
            }
            OrdersIntent::CreateStart | OrdersIntent::UpdateStart | OrdersIntent::CancelStart => {
                self.loading = true;
                self.error = None;
            }
            OrdersIntent::CreateSuccess(order) => {
                self.loading = false;
                // Newest-first ordering
                self.orders.insert(0, order);
            }
            OrdersIntent::UpdateSuccess(order) => {
                self.loading = false;
                if let Some(index) = self.orders.iter().position(|o| o.id == order.id) {
                    let current = self.orders[index].status;
                    if current.can_transition_to(order.status) {
                        self.orders[index] = order;
                    } else {
                        self.error = Some(format!(
                            "invalid status transition {} -> {} for order {}",
                            current, order.status, order.id
                        ));
                    }
                }
            }
            OrdersIntent::CancelSuccess { id } => {
                self.loading = false;
                if let Some(order) = self.orders.iter_mut().find(|o| o.id == id) {
                    if order.status.is_terminal() {
                        self.error = Some(format!(
                            "order {} cannot be cancelled from status {}",
                            id, order.status
                        ));
                    } else {
                        order.status = OrderStatus::Cancelled;
                    }
                }
            }
            OrdersIntent::CreateFailure(message)
            | OrdersIntent::UpdateFailure(message)
            | OrdersIntent::CancelFailure(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            OrdersIntent::SetSelected(order) => {
                self.selected = order;
            }
            OrdersIntent::SetFilters(patch) => {
                self.filters.apply(patch);
                // Any filter change invalidates the current page
                self.pagination.reset_page();
            }
            OrdersIntent::SetPagination(patch) => {
                self.pagination.apply(patch);
            }
            OrdersIntent::UpdateStatistics(patch) => {
                self.statistics.apply(patch);
            }
            OrdersIntent::ClearError => {
                self.error = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Customer;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_customer(id: i64) -> Customer {
        Customer {
            id,
            whatsapp_number: "+5511999990000".to_string(),
            name: "Maria Souza".to_string(),
            email: None,
            interaction_history: Vec::new(),
            last_interaction: None,
            created_at: Utc::now(),
        }
    }

    fn sample_order(id: i64, status: OrderStatus) -> Order {
        Order {
            id,
            customer: sample_customer(id * 10),
            status,
            total_amount: dec!(50),
            payment_method: PaymentMethod::Pix,
            payment_id: None,
            items: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn state_with(orders: Vec<Order>) -> OrdersState {
        let mut state = OrdersState::default();
        state.reduce(OrdersIntent::FetchStart);
        let fetch_id = state.last_fetch_id();
        state.reduce(OrdersIntent::FetchSuccess {
            fetch_id,
            total: orders.len() as u64,
            orders,
        });
        state
    }

    #[test]
    fn fetch_start_sets_loading_and_clears_error() {
        let mut state = OrdersState::default();
        state.reduce(OrdersIntent::FetchFailure {
            fetch_id: 0,
            message: "boom".to_string(),
        });
        state.reduce(OrdersIntent::FetchStart);

        assert!(state.loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn fetch_success_replaces_collection_and_total() {
        let mut state = state_with(vec![sample_order(1, OrderStatus::Pending)]);

        state.reduce(OrdersIntent::FetchStart);
        let fetch_id = state.last_fetch_id();
        state.reduce(OrdersIntent::FetchSuccess {
            fetch_id,
            orders: vec![
                sample_order(2, OrderStatus::Paid),
                sample_order(3, OrderStatus::Pending),
            ],
            total: 27,
        });

        let ids: Vec<i64> = state.orders().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(state.pagination().total, 27);
        assert!(!state.loading());
    }

    #[test]
    fn stale_fetch_success_is_ignored() {
        let mut state = OrdersState::default();

        state.reduce(OrdersIntent::FetchStart);
        let first = state.last_fetch_id();
        state.reduce(OrdersIntent::FetchStart);
        let second = state.last_fetch_id();
        assert!(second > first);

        state.reduce(OrdersIntent::FetchSuccess {
            fetch_id: second,
            orders: vec![sample_order(2, OrderStatus::Paid)],
            total: 1,
        });
        // The older request resolves last; its result must not clobber
        state.reduce(OrdersIntent::FetchSuccess {
            fetch_id: first,
            orders: vec![sample_order(1, OrderStatus::Pending)],
            total: 99,
        });

        assert_eq!(state.orders().len(), 1);
        assert_eq!(state.orders()[0].id, 2);
        assert_eq!(state.pagination().total, 1);
    }

    #[test]
    fn stale_fetch_failure_is_ignored() {
        let mut state = OrdersState::default();
        state.reduce(OrdersIntent::FetchStart);
        let stale = state.last_fetch_id();
        state.reduce(OrdersIntent::FetchStart);

        state.reduce(OrdersIntent::FetchFailure {
            fetch_id: stale,
            message: "timeout".to_string(),
        });

        assert!(state.loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn create_success_prepends() {
        let mut state = state_with(vec![sample_order(1, OrderStatus::Pending)]);
        state.reduce(OrdersIntent::CreateSuccess(sample_order(
            2,
            OrderStatus::Pending,
        )));

        let ids: Vec<i64> = state.orders().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn update_success_replaces_in_place() {
        let mut state = state_with(vec![
            sample_order(1, OrderStatus::Pending),
            sample_order(2, OrderStatus::Pending),
        ]);

        let mut updated = sample_order(2, OrderStatus::Paid);
        updated.total_amount = dec!(120);
        state.reduce(OrdersIntent::UpdateSuccess(updated));

        assert_eq!(state.orders()[0].id, 1);
        assert_eq!(state.orders()[1].status, OrderStatus::Paid);
        assert_eq!(state.orders()[1].total_amount, dec!(120));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn update_success_with_unknown_id_is_a_noop() {
        let mut state = state_with(vec![sample_order(1, OrderStatus::Pending)]);
        let before = state.clone();

        state.reduce(OrdersIntent::UpdateSuccess(sample_order(
            9,
            OrderStatus::Paid,
        )));

        assert_eq!(state.orders(), before.orders());
    }

    #[test]
    fn update_success_rejects_invalid_transition() {
        let mut state = state_with(vec![sample_order(1, OrderStatus::Delivered)]);

        state.reduce(OrdersIntent::UpdateSuccess(sample_order(
            1,
            OrderStatus::Pending,
        )));

        assert_eq!(state.orders()[0].status, OrderStatus::Delivered);
        assert!(state.error().unwrap().contains("invalid status transition"));
    }

    #[test]
    fn cancel_success_only_touches_status() {
        let mut state = state_with(vec![sample_order(1, OrderStatus::Pending)]);
        let before = state.orders()[0].clone();

        state.reduce(OrdersIntent::CancelSuccess { id: 1 });

        let after = &state.orders()[0];
        assert_eq!(after.status, OrderStatus::Cancelled);
        assert_eq!(after.total_amount, before.total_amount);
        assert_eq!(after.customer, before.customer);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn cancel_success_with_unknown_id_is_a_noop() {
        let mut state = state_with(vec![sample_order(1, OrderStatus::Pending)]);
        let before = state.orders().to_vec();

        state.reduce(OrdersIntent::CancelSuccess { id: 42 });

        assert_eq!(state.orders(), &before[..]);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn cancel_of_terminal_order_is_rejected() {
        let mut state = state_with(vec![sample_order(1, OrderStatus::Delivered)]);

        state.reduce(OrdersIntent::CancelSuccess { id: 1 });

        assert_eq!(state.orders()[0].status, OrderStatus::Delivered);
        assert!(state.error().unwrap().contains("cannot be cancelled"));
    }

    #[test]
    fn set_filters_resets_page() {
        let mut state = OrdersState::default();
        state.reduce(OrdersIntent::SetPagination(PaginationPatch {
            page: Some(5),
            ..Default::default()
        }));

        state.reduce(OrdersIntent::SetFilters(OrderFilterPatch {
            status: Some(Filter::Only(OrderStatus::Paid)),
            ..Default::default()
        }));

        assert_eq!(state.pagination().page, 1);
        assert_eq!(
            state.filters().status.as_option(),
            Some(&OrderStatus::Paid)
        );
        // Untouched filter fields are retained
        assert_eq!(state.filters().payment_method, Filter::All);
    }

    #[test]
    fn set_pagination_does_not_touch_filters() {
        let mut state = OrdersState::default();
        state.reduce(OrdersIntent::SetFilters(OrderFilterPatch {
            search: Some("maria".to_string()),
            ..Default::default()
        }));

        state.reduce(OrdersIntent::SetPagination(PaginationPatch {
            page: Some(2),
            ..Default::default()
        }));

        assert_eq!(state.filters().search, "maria");
        assert_eq!(state.pagination().page, 2);
    }

    #[test]
    fn statistics_patch_replaces_present_fields_only() {
        let mut state = OrdersState::default();
        state.reduce(OrdersIntent::UpdateStatistics(OrderStatisticsPatch {
            total_orders: Some(10),
            total_revenue: Some(dec!(500)),
            ..Default::default()
        }));
        state.reduce(OrdersIntent::UpdateStatistics(OrderStatisticsPatch {
            total_orders: Some(11),
            ..Default::default()
        }));

        assert_eq!(state.statistics().total_orders, 11);
        assert_eq!(state.statistics().total_revenue, dec!(500));
    }

    #[test]
    fn clear_error_is_idempotent() {
        let mut state = OrdersState::default();
        state.reduce(OrdersIntent::ClearError);
        assert_eq!(state.error(), None);

        state.reduce(OrdersIntent::CreateFailure("boom".to_string()));
        state.reduce(OrdersIntent::ClearError);
        assert_eq!(state.error(), None);
    }
}
