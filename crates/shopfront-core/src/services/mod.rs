//! Typed wrappers over the storefront REST endpoints, one module per backend
//! surface. All of them ride the authenticated pipeline in [`crate::client`].

pub mod account;
pub mod admin;
pub mod cart;
pub mod orders;
pub mod products;
