//! SQL text and the translation of listing scope and filter into `WHERE`
//! clauses.

use repairs_core::{access::TicketScope, filter::TicketFilter};
use rusqlite::types::Value;

pub const USER_COLUMNS: &str =
  "user_id, username, password_hash, given_name, family_name, is_staff";

pub const CUSTOMER_SELECT: &str = "
SELECT c.customer_id, c.user_id, u.given_name, u.family_name, c.address
FROM customers c
JOIN users u ON u.user_id = c.user_id";

pub const EMPLOYEE_SELECT: &str = "
SELECT e.employee_id, e.user_id, u.given_name, u.family_name, e.specialty
FROM employees e
JOIN users u ON u.user_id = e.user_id";

/// Tickets with one level of expansion: customer columns start at 4,
/// employee columns (all NULL when unassigned) at 9.
pub const TICKET_SELECT: &str = "
SELECT t.ticket_id, t.description, t.emergency, t.date_completed,
       c.customer_id, c.user_id, cu.given_name, cu.family_name, c.address,
       e.employee_id, e.user_id, eu.given_name, eu.family_name, e.specialty
FROM service_tickets t
JOIN customers c       ON c.customer_id = t.customer_id
JOIN users cu          ON cu.user_id    = c.user_id
LEFT JOIN employees e  ON e.employee_id = t.employee_id
LEFT JOIN users eu     ON eu.user_id    = e.user_id";

/// Build the `WHERE … ORDER BY` tail for a ticket listing, with positional
/// parameters.
pub fn ticket_listing(scope: &TicketScope, filter: &TicketFilter) -> (String, Vec<Value>) {
  let mut clauses: Vec<String> = Vec::new();
  let mut params: Vec<Value> = Vec::new();

  if let Some(user_id) = scope.owner() {
    params.push(Value::Integer(user_id));
    clauses.push(format!("c.user_id = ?{}", params.len()));
  }

  match filter {
    TicketFilter::Everything => {}
    TicketFilter::Done => clauses.push("t.date_completed IS NOT NULL".into()),
    TicketFilter::Unclaimed => clauses.push("t.employee_id IS NULL".into()),
    TicketFilter::InProgress => clauses
      .push("t.employee_id IS NOT NULL AND t.date_completed IS NULL".into()),
    TicketFilter::DescriptionContains(s) => {
      // `instr` is case-sensitive, unlike `LIKE`.
      params.push(Value::Text(s.clone()));
      clauses.push(format!("instr(t.description, ?{}) > 0", params.len()));
    }
  }

  let mut sql = String::new();
  if !clauses.is_empty() {
    sql.push_str(" WHERE ");
    sql.push_str(&clauses.join(" AND "));
  }
  sql.push_str(" ORDER BY t.ticket_id");
  (sql, params)
}
