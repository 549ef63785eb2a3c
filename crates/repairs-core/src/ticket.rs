//! Service tickets.
//!
//! A ticket always belongs to exactly one customer. Assignment and completion
//! are independent, nullable fields set by staff.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::person::{Customer, Employee};

/// A ticket with its customer and employee expanded one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTicket {
  pub id:             i64,
  pub description:    String,
  pub emergency:      bool,
  pub date_completed: Option<NaiveDate>,
  pub customer:       Customer,
  pub employee:       Option<Employee>,
}

impl ServiceTicket {
  pub fn is_claimed(&self) -> bool { self.employee.is_some() }

  pub fn is_done(&self) -> bool { self.date_completed.is_some() }
}

/// Input for [`RepairStore::create_ticket`](crate::store::RepairStore::create_ticket).
#[derive(Debug, Clone)]
pub struct NewTicket {
  pub customer_id: i64,
  pub description: String,
  pub emergency:   bool,
}

/// A staff update: assign an employee and optionally touch the completion
/// date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketUpdate {
  pub employee_id:    i64,
  /// `None` leaves the stored date alone; `Some(None)` clears it.
  pub date_completed: Option<Option<NaiveDate>>,
}
