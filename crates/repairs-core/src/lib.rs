//! Core types and trait definitions for the repair-ticket service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Policy (who may see which ticket, which refinement a query selects) lives
//! here as plain functions so it can be tested without a store.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod error;
pub mod filter;
pub mod person;
pub mod store;
pub mod ticket;

pub use error::{Error, Result};
