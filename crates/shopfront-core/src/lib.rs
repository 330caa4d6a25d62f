//! Client library for the storefront backend, shared by the CLI and any
//! future front-ends. Wraps the REST API with an authenticated request
//! pipeline (bearer attachment plus single refresh-and-retry on 401) and
//! typed services for products, cart, orders, account, and admin endpoints.

pub mod auth;
pub mod client;
pub mod config;
pub mod services;
