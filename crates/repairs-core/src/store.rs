//! The `RepairStore` trait.
//!
//! Implemented by storage backends (e.g. `repairs-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  access::TicketScope,
  filter::TicketFilter,
  person::{Credentials, Customer, Employee, NewUser, User},
  ticket::{NewTicket, ServiceTicket, TicketUpdate},
};

/// Errors a [`RepairStore`] backend can report.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when an operation named a ticket, employee, customer or user
  /// that does not exist.
  fn is_not_found(&self) -> bool;
}

/// Abstraction over a repair-ticket store backend.
///
/// Lookups return `Ok(None)` for a missing id. Writes that name a missing
/// row fail with the backend's not-found error.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RepairStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails if the username is taken.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Look up a user and its password hash by username.
  fn find_credentials<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  // ── Customers ─────────────────────────────────────────────────────────

  /// Attach a customer profile to an existing user.
  fn add_customer(
    &self,
    user_id: i64,
    address: String,
  ) -> impl Future<Output = Result<Customer, Self::Error>> + Send + '_;

  fn get_customer(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  /// The customer profile owned by `user_id`, if any.
  fn customer_for_user(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  fn list_customers(
    &self,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + '_;

  // ── Employees ─────────────────────────────────────────────────────────

  /// Attach an employee profile to an existing user.
  fn add_employee(
    &self,
    user_id: i64,
    specialty: String,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  fn get_employee(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send + '_;

  fn list_employees(
    &self,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send + '_;

  // ── Tickets ───────────────────────────────────────────────────────────

  /// Persist a new, unassigned and incomplete ticket.
  fn create_ticket(
    &self,
    input: NewTicket,
  ) -> impl Future<Output = Result<ServiceTicket, Self::Error>> + Send + '_;

  fn get_ticket(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ServiceTicket>, Self::Error>> + Send + '_;

  /// Tickets admitted by `scope` and matched by `filter`, ordered by id.
  /// Every returned ticket satisfies [`TicketScope::admits`].
  fn list_tickets(
    &self,
    scope: TicketScope,
    filter: TicketFilter,
  ) -> impl Future<Output = Result<Vec<ServiceTicket>, Self::Error>> + Send + '_;

  /// Assign an employee and optionally set the completion date.
  fn update_ticket(
    &self,
    id: i64,
    update: TicketUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Permanently remove a ticket.
  fn delete_ticket(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
