//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Completion dates are stored as `YYYY-MM-DD` strings. Booleans are stored
//! as integers by rusqlite.

use chrono::NaiveDate;
use repairs_core::{
  person::{Credentials, Customer, Employee, User, full_name},
  ticket::ServiceTicket,
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `users` row, including the password hash.
pub struct RawUser {
  pub user_id:       i64,
  pub username:      String,
  pub password_hash: String,
  pub given_name:    String,
  pub family_name:   String,
  pub is_staff:      bool,
}

impl RawUser {
  /// Columns as selected by [`USER_COLUMNS`](crate::query::USER_COLUMNS).
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      password_hash: row.get(2)?,
      given_name:    row.get(3)?,
      family_name:   row.get(4)?,
      is_staff:      row.get(5)?,
    })
  }

  pub fn into_credentials(self) -> Credentials {
    Credentials {
      password_hash: self.password_hash,
      user:          User {
        user_id:     self.user_id,
        username:    self.username,
        given_name:  self.given_name,
        family_name: self.family_name,
        is_staff:    self.is_staff,
      },
    }
  }

}

/// A `customers` row joined with its user's name fields.
pub struct RawCustomer {
  pub customer_id: i64,
  pub user_id:     i64,
  pub given_name:  String,
  pub family_name: String,
  pub address:     String,
}

impl RawCustomer {
  /// Reads five columns starting at `at`.
  pub fn from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      customer_id: row.get(at)?,
      user_id:     row.get(at + 1)?,
      given_name:  row.get(at + 2)?,
      family_name: row.get(at + 3)?,
      address:     row.get(at + 4)?,
    })
  }

  pub fn into_customer(self) -> Customer {
    Customer {
      id:        self.customer_id,
      user_id:   self.user_id,
      full_name: full_name(&self.given_name, &self.family_name),
      address:   self.address,
    }
  }
}

/// An `employees` row joined with its user's name fields.
pub struct RawEmployee {
  pub employee_id: i64,
  pub user_id:     i64,
  pub given_name:  String,
  pub family_name: String,
  pub specialty:   String,
}

impl RawEmployee {
  /// Reads five columns starting at `at`.
  pub fn from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      employee_id: row.get(at)?,
      user_id:     row.get(at + 1)?,
      given_name:  row.get(at + 2)?,
      family_name: row.get(at + 3)?,
      specialty:   row.get(at + 4)?,
    })
  }

  /// Like [`from_row`](Self::from_row) for a `LEFT JOIN`: `None` when the
  /// employee id column is NULL.
  pub fn from_row_opt(
    row: &rusqlite::Row<'_>,
    at: usize,
  ) -> rusqlite::Result<Option<Self>> {
    let id: Option<i64> = row.get(at)?;
    match id {
      Some(_) => Self::from_row(row, at).map(Some),
      None => Ok(None),
    }
  }

  pub fn into_employee(self) -> Employee {
    Employee {
      id:        self.employee_id,
      user_id:   self.user_id,
      specialty: self.specialty,
      full_name: full_name(&self.given_name, &self.family_name),
    }
  }
}

/// A `service_tickets` row with its customer and employee expanded.
pub struct RawTicket {
  pub ticket_id:      i64,
  pub description:    String,
  pub emergency:      bool,
  pub date_completed: Option<String>,
  pub customer:       RawCustomer,
  pub employee:       Option<RawEmployee>,
}

impl RawTicket {
  /// Columns as selected by [`TICKET_SELECT`](crate::query::TICKET_SELECT).
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      ticket_id:      row.get(0)?,
      description:    row.get(1)?,
      emergency:      row.get(2)?,
      date_completed: row.get(3)?,
      customer:       RawCustomer::from_row(row, 4)?,
      employee:       RawEmployee::from_row_opt(row, 9)?,
    })
  }

  pub fn into_ticket(self) -> Result<ServiceTicket> {
    Ok(ServiceTicket {
      id:             self.ticket_id,
      description:    self.description,
      emergency:      self.emergency,
      date_completed: self.date_completed.as_deref().map(decode_date).transpose()?,
      customer:       self.customer.into_customer(),
      employee:       self.employee.map(RawEmployee::into_employee),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_round_trip() {
    let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(encode_date(d), "2024-02-29");
    assert_eq!(decode_date("2024-02-29").unwrap(), d);
  }

  #[test]
  fn bad_date_is_an_error() {
    assert!(matches!(decode_date("29/02/2024"), Err(Error::DateParse(_))));
  }
}
