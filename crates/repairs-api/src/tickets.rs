//! Handlers for `/tickets` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/tickets` | Customers see their own; staff may add `?status=` or `?description=` |
//! | `GET`    | `/tickets/:id` | 404 if not found |
//! | `POST`   | `/tickets` | Customers only. Body: [`CreateBody`]; returns 201 + ticket |
//! | `PUT`    | `/tickets/:id` | Staff only. Body: [`UpdateBody`]; returns 204 |
//! | `DELETE` | `/tickets/:id` | Staff only; returns 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path,
    Query,
    State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use repairs_core::{
  access::TicketScope,
  filter::{ListQuery, TicketFilter},
  store::RepairStore,
  ticket::{NewTicket, ServiceTicket, TicketUpdate},
};
use serde::{Deserialize, Deserializer};

use crate::{caller::Authenticated, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /tickets[?status=done|all|unclaimed|inprogress][&description=<s>]`
///
/// The query string is taken as raw pairs so a repeated key is not a
/// rejection; [`ListQuery::from_pairs`] keeps the last value.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<ServiceTicket>>, ApiError>
where
  S: RepairStore,
{
  let Query(pairs) = pairs?;
  let query = ListQuery::from_pairs(pairs);
  let scope = TicketScope::for_caller(&caller);
  let filter = TicketFilter::for_caller(&caller, &query);
  tracing::debug!(user = %caller.identity.username, ?scope, ?filter, "listing tickets");

  let tickets = store
    .list_tickets(scope, filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(tickets))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /tickets/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Authenticated(_caller): Authenticated,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ServiceTicket>, ApiError>
where
  S: RepairStore,
{
  let Path(id) = path?;
  let ticket = store
    .get_ticket(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("ticket not found: {id}")))?;
  Ok(Json(ticket))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub description: String,
  pub emergency:   bool,
}

/// `POST /tickets` — body: `{"description":"leak","emergency":true}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RepairStore,
{
  let customer = store
    .customer_for_user(caller.identity.user_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::Forbidden("only customers can file tickets".into()))?;
  let Json(body) = payload?;

  let ticket = store
    .create_ticket(NewTicket {
      customer_id: customer.id,
      description: body.description,
      emergency:   body.emergency,
    })
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(ticket = ticket.id, customer = customer.id, "ticket created");
  Ok((StatusCode::CREATED, Json(ticket)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  /// Id of the employee to assign.
  pub employee:       i64,
  /// Absent: keep the stored date. `null`: clear it.
  #[serde(default, deserialize_with = "present")]
  pub date_completed: Option<Option<NaiveDate>>,
}

/// Wraps any value that is present in the body, including `null`, in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}

/// `PUT /tickets/:id` — body: `{"employee":2[,"date_completed":"2024-05-17"]}`
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  path: Result<Path<i64>, PathRejection>,
  payload: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: RepairStore,
{
  if !caller.is_staff() {
    return Err(ApiError::Forbidden("only staff can update tickets".into()));
  }
  let Path(id) = path?;
  let Json(body) = payload?;

  // Ticket and employee existence are checked inside the write.
  store
    .update_ticket(id, TicketUpdate {
      employee_id:    body.employee,
      date_completed: body.date_completed,
    })
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(ticket = id, employee = body.employee, by = %caller.identity.username, "ticket updated");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /tickets/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: RepairStore,
{
  if !caller.is_staff() {
    return Err(ApiError::Forbidden("only staff can delete tickets".into()));
  }
  let Path(id) = path?;

  store
    .delete_ticket(id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(ticket = id, by = %caller.identity.username, "ticket deleted");
  Ok(StatusCode::NO_CONTENT)
}
