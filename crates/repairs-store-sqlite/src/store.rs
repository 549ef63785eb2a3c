//! [`SqliteStore`] — the SQLite implementation of [`RepairStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use repairs_core::{
  access::TicketScope,
  filter::TicketFilter,
  person::{Credentials, Customer, Employee, NewUser, User},
  store::RepairStore,
  ticket::{NewTicket, ServiceTicket, TicketUpdate},
};

use crate::{
  Error, Result,
  encode::{RawCustomer, RawEmployee, RawTicket, RawUser, encode_date},
  query::{CUSTOMER_SELECT, EMPLOYEE_SELECT, TICKET_SELECT, USER_COLUMNS, ticket_listing},
  schema::SCHEMA,
};

/// What a guarded write found when it looked for the rows it references.
enum WriteOutcome {
  Written,
  MissingTicket,
  MissingEmployee,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A repair-ticket store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(?path, "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a single customer where `column = id`.
  async fn customer_where(&self, column: &'static str, id: i64) -> Result<Option<Customer>> {
    let raw: Option<RawCustomer> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{CUSTOMER_SELECT} WHERE {column} = ?1"),
            rusqlite::params![id],
            |row| RawCustomer::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    Ok(raw.map(RawCustomer::into_customer))
  }
}

// ─── RepairStore impl ────────────────────────────────────────────────────────

impl RepairStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let username    = input.username.clone();
    let given_name  = input.given_name.clone();
    let family_name = input.family_name.clone();
    let is_staff    = input.is_staff;

    let user_id: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            rusqlite::params![input.username],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO users (username, password_hash, given_name, family_name, is_staff)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            input.username,
            input.password_hash,
            input.given_name,
            input.family_name,
            input.is_staff,
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    let user_id =
      user_id.ok_or_else(|| repairs_core::Error::UsernameTaken(username.clone()))?;

    Ok(User {
      user_id,
      username,
      given_name,
      family_name,
      is_staff,
    })
  }

  async fn find_credentials<'a>(&'a self, username: &'a str) -> Result<Option<Credentials>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            rusqlite::params![username],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    Ok(raw.map(RawUser::into_credentials))
  }

  // ── Customers ─────────────────────────────────────────────────────────────

  async fn add_customer(&self, user_id: i64, address: String) -> Result<Customer> {
    let raw: Option<RawCustomer> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let names: Option<(String, String)> = tx
          .query_row(
            "SELECT given_name, family_name FROM users WHERE user_id = ?1",
            rusqlite::params![user_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;
        let Some((given_name, family_name)) = names else {
          return Ok(None);
        };

        tx.execute(
          "INSERT INTO customers (user_id, address) VALUES (?1, ?2)",
          rusqlite::params![user_id, address],
        )?;
        let customer_id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Some(RawCustomer {
          customer_id,
          user_id,
          given_name,
          family_name,
          address,
        }))
      })
      .await?;

    raw
      .map(RawCustomer::into_customer)
      .ok_or(Error::Core(repairs_core::Error::UserNotFound(user_id)))
  }

  async fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
    self.customer_where("c.customer_id", id).await
  }

  async fn customer_for_user(&self, user_id: i64) -> Result<Option<Customer>> {
    self.customer_where("c.user_id", user_id).await
  }

  async fn list_customers(&self) -> Result<Vec<Customer>> {
    let raws: Vec<RawCustomer> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{CUSTOMER_SELECT} ORDER BY c.customer_id"))?;
        let rows = stmt
          .query_map([], |row| RawCustomer::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawCustomer::into_customer).collect())
  }

  // ── Employees ─────────────────────────────────────────────────────────────

  async fn add_employee(&self, user_id: i64, specialty: String) -> Result<Employee> {
    let raw: Option<RawEmployee> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let names: Option<(String, String)> = tx
          .query_row(
            "SELECT given_name, family_name FROM users WHERE user_id = ?1",
            rusqlite::params![user_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;
        let Some((given_name, family_name)) = names else {
          return Ok(None);
        };

        tx.execute(
          "INSERT INTO employees (user_id, specialty) VALUES (?1, ?2)",
          rusqlite::params![user_id, specialty],
        )?;
        let employee_id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Some(RawEmployee {
          employee_id,
          user_id,
          given_name,
          family_name,
          specialty,
        }))
      })
      .await?;

    raw
      .map(RawEmployee::into_employee)
      .ok_or(Error::Core(repairs_core::Error::UserNotFound(user_id)))
  }

  async fn get_employee(&self, id: i64) -> Result<Option<Employee>> {
    let raw: Option<RawEmployee> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{EMPLOYEE_SELECT} WHERE e.employee_id = ?1"),
            rusqlite::params![id],
            |row| RawEmployee::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    Ok(raw.map(RawEmployee::into_employee))
  }

  async fn list_employees(&self) -> Result<Vec<Employee>> {
    let raws: Vec<RawEmployee> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{EMPLOYEE_SELECT} ORDER BY e.employee_id"))?;
        let rows = stmt
          .query_map([], |row| RawEmployee::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawEmployee::into_employee).collect())
  }

  // ── Tickets ───────────────────────────────────────────────────────────────

  async fn create_ticket(&self, input: NewTicket) -> Result<ServiceTicket> {
    let customer_id = input.customer_id;

    let raw: Option<RawTicket> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let customer_exists = tx
          .query_row(
            "SELECT 1 FROM customers WHERE customer_id = ?1",
            rusqlite::params![input.customer_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !customer_exists {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO service_tickets (customer_id, employee_id, description, emergency, date_completed)
           VALUES (?1, NULL, ?2, ?3, NULL)",
          rusqlite::params![input.customer_id, input.description, input.emergency],
        )?;
        let ticket_id = tx.last_insert_rowid();
        let raw = tx.query_row(
          &format!("{TICKET_SELECT} WHERE t.ticket_id = ?1"),
          rusqlite::params![ticket_id],
          RawTicket::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw
      .ok_or(Error::Core(repairs_core::Error::CustomerNotFound(customer_id)))?
      .into_ticket()
  }

  async fn get_ticket(&self, id: i64) -> Result<Option<ServiceTicket>> {
    let raw: Option<RawTicket> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{TICKET_SELECT} WHERE t.ticket_id = ?1"),
            rusqlite::params![id],
            RawTicket::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTicket::into_ticket).transpose()
  }

  async fn list_tickets(
    &self,
    scope:  TicketScope,
    filter: TicketFilter,
  ) -> Result<Vec<ServiceTicket>> {
    let (tail, params) = ticket_listing(&scope, &filter);

    let raws: Vec<RawTicket> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!("{TICKET_SELECT}{tail}"))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawTicket::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let tickets = raws
      .into_iter()
      .map(RawTicket::into_ticket)
      .collect::<Result<Vec<_>>>()?;
    Ok(tickets.into_iter().filter(|t| scope.admits(t)).collect())
  }

  async fn update_ticket(&self, id: i64, update: TicketUpdate) -> Result<()> {
    let employee_id = update.employee_id;
    let date_completed = update
      .date_completed
      .map(|d| d.map(encode_date));

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let ticket_exists = tx
          .query_row(
            "SELECT 1 FROM service_tickets WHERE ticket_id = ?1",
            rusqlite::params![id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !ticket_exists {
          return Ok(WriteOutcome::MissingTicket);
        }

        let employee_exists = tx
          .query_row(
            "SELECT 1 FROM employees WHERE employee_id = ?1",
            rusqlite::params![employee_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !employee_exists {
          return Ok(WriteOutcome::MissingEmployee);
        }

        match date_completed {
          Some(date) => tx.execute(
            "UPDATE service_tickets SET employee_id = ?1, date_completed = ?2
             WHERE ticket_id = ?3",
            rusqlite::params![employee_id, date, id],
          )?,
          None => tx.execute(
            "UPDATE service_tickets SET employee_id = ?1 WHERE ticket_id = ?2",
            rusqlite::params![employee_id, id],
          )?,
        };
        tx.commit()?;
        Ok(WriteOutcome::Written)
      })
      .await?;

    match outcome {
      WriteOutcome::Written => Ok(()),
      WriteOutcome::MissingTicket => Err(repairs_core::Error::TicketNotFound(id).into()),
      WriteOutcome::MissingEmployee => {
        Err(repairs_core::Error::EmployeeNotFound(employee_id).into())
      }
    }
  }

  async fn delete_ticket(&self, id: i64) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM service_tickets WHERE ticket_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    if removed == 0 {
      return Err(repairs_core::Error::TicketNotFound(id).into());
    }
    Ok(())
  }
}
