//! JSON REST API for the repair-ticket service.
//!
//! Exposes an axum [`Router`] backed by any [`repairs_core::store::RepairStore`].
//! Authentication, TLS, and transport concerns are the caller's
//! responsibility: something in front of this router must resolve the
//! credentials and insert a [`repairs_core::access::Caller`] into the request
//! extensions.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(repairs_api::api_router(store.clone()))
//! ```

pub mod caller;
pub mod error;
pub mod people;
pub mod tickets;

use std::sync::Arc;

use axum::{Router, routing::get};
use repairs_core::store::RepairStore;

pub use caller::Authenticated;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RepairStore + 'static,
{
  Router::new()
    // Tickets
    .route("/tickets", get(tickets::list::<S>).post(tickets::create::<S>))
    .route(
      "/tickets/{id}",
      get(tickets::get_one::<S>)
        .put(tickets::update_one::<S>)
        .delete(tickets::delete_one::<S>),
    )
    // People
    .route("/customers", get(people::list_customers::<S>))
    .route("/customers/{id}", get(people::get_customer::<S>))
    .route("/employees", get(people::list_employees::<S>))
    .route("/employees/{id}", get(people::get_employee::<S>))
    .with_state(store)
}
