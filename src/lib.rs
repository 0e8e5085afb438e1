// src/lib.rs
// Main library module declarations

pub mod api;
pub mod config;
pub mod domain;
pub mod effects;
pub mod session;
pub mod store;
