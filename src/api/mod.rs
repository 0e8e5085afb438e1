// src/api/mod.rs
pub mod client;
pub mod memory;

pub use client::{
    ApiClient, Credentials, CustomerPatch, ListQuery, LoginResponse, NewCustomer, NewOrder,
    NewProduct, NewUser, OrderPatch, Page, ProductPatch, ProfilePatch,
};
pub use memory::InMemoryApi;
