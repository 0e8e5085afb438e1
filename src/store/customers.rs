// src/store/customers.rs
use crate::domain::models::{Customer, Interaction};
use crate::store::meta::{DateRange, Filter, Pagination, PaginationPatch};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerActivity {
    Active,
    Inactive,
}

impl CustomerActivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerActivity::Active => "active",
            CustomerActivity::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilters {
    pub search: String,
    pub status: Filter<CustomerActivity>,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilterPatch {
    pub search: Option<String>,
    pub status: Option<Filter<CustomerActivity>>,
    pub date_range: Option<DateRange>,
}

impl CustomerFilters {
    fn apply(&mut self, patch: CustomerFilterPatch) {
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
pub struct CustomerStatistics {
    pub total_customers: u64,
    pub active_customers: u64,
    pub average_order_value: Decimal,
    pub customers_by_source: HashMap<String, u64>,
    pub customer_activity: Vec<DailyActivity>,
}

/// Interactions recorded on one day, for the activity chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub interactions: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerStatisticsPatch {
    pub total_customers: Option<u64>,
    pub active_customers: Option<u64>,
    pub average_order_value: Option<Decimal>,
    pub customers_by_source: Option<HashMap<String, u64>>,
    pub customer_activity: Option<Vec<DailyActivity>>,
}

impl CustomerStatistics {
    fn apply(&mut self, patch: CustomerStatisticsPatch) {
        if let Some(total_customers) = patch.total_customers {
            self.total_customers = total_customers;
        }
        if let Some(active_customers) = patch.active_customers {
            self.active_customers = active_customers;
        }
        if let Some(average_order_value) = patch.average_order_value {
            self.average_order_value = average_order_value;
        }
        if let Some(customers_by_source) = patch.customers_by_source {
            self.customers_by_source = customers_by_source;
        }
        if let Some(customer_activity) = patch.customer_activity {
            self.customer_activity = customer_activity;
        }
    }
}

/// State transition requests for the customers slice.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomersIntent {
    FetchStart,
    FetchSuccess {
        fetch_id: u64,
        customers: Vec<Customer>,
        total: u64,
    },
    FetchFailure {
        fetch_id: u64,
        message: String,
    },
    CreateStart,
    CreateSuccess(Customer),
    CreateFailure(String),
    UpdateStart,
    UpdateSuccess(Customer),
    UpdateFailure(String),
    /// Append one entry to a customer's interaction log and stamp
    /// `last_interaction`. Unknown customer ids are ignored.
    RecordInteraction {
        customer_id: i64,
        interaction: Interaction,
    },
    SetSelected(Option<Customer>),
    SetFilters(CustomerFilterPatch),
    SetPagination(PaginationPatch),
    UpdateStatistics(CustomerStatisticsPatch),
    ClearError,
}

/// Customers slice: the customer collection plus its request metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomersState {
    customers: Vec<Customer>,
    loading: bool,
    error: Option<String>,
    selected: Option<Customer>,
    filters: CustomerFilters,
    pagination: Pagination,
    statistics: CustomerStatistics,
    last_fetch_id: u64,
}

impl CustomersState {
    // Selectors
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&Customer> {
        self.selected.as_ref()
    }

    pub fn filters(&self) -> &CustomerFilters {
        &self.filters
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn statistics(&self) -> &CustomerStatistics {
        &self.statistics
    }

    pub fn last_fetch_id(&self) -> u64 {
        self.last_fetch_id
    }

    pub(crate) fn reduce(&mut self, intent: CustomersIntent) {
        match intent {
            CustomersIntent::FetchStart => {
                self.last_fetch_id += 1;
                self.loading = true;
                self.error = None;
            }
            CustomersIntent::FetchSuccess {
                fetch_id,
                customers,
                total,
            } => {
                if fetch_id != self.last_fetch_id {
                    log::debug!(
                        "ignoring stale customers fetch {} (current {})",
                        fetch_id,
                        self.last_fetch_id
                    );
                    return;
                }
                self.loading = false;
                self.customers = customers;
                self.pagination.total = total;
            }
            CustomersIntent::FetchFailure { fetch_id, message } => {
                if fetch_id != self.last_fetch_id {
                    return;
                }
                self.loading = false;
                self.error = Some(message);
            }
            CustomersIntent::CreateStart | CustomersIntent::UpdateStart => {
                self.loading = true;
                self.error = None;
            }
            CustomersIntent::CreateSuccess(customer) => {
                self.loading = false;
                self.customers.insert(0, customer);
            }
            CustomersIntent::UpdateSuccess(customer) => {
                self.loading = false;
                if let Some(index) = self.customers.iter().position(|c| c.id == customer.id) {
                    self.customers[index] = customer;
                }
            }
            CustomersIntent::CreateFailure(message) | CustomersIntent::UpdateFailure(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            CustomersIntent::RecordInteraction {
                customer_id,
                interaction,
            } => {
                if let Some(customer) = self.customers.iter_mut().find(|c| c.id == customer_id) {
                    customer.last_interaction = Some(interaction.timestamp);
                    customer.interaction_history.push(interaction);
                }
            }
            CustomersIntent::SetSelected(customer) => {
                self.selected = customer;
            }
            CustomersIntent::SetFilters(patch) => {
                self.filters.apply(patch);
                self.pagination.reset_page();
            }
            CustomersIntent::SetPagination(patch) => {
                self.pagination.apply(patch);
            }
            CustomersIntent::UpdateStatistics(patch) => {
                self.statistics.apply(patch);
            }
            CustomersIntent::ClearError => {
                self.error = None;
            }
        }
    }
}
