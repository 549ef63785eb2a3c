//! Read-only handlers for `/customers` and `/employees`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use repairs_core::{
  person::{Customer, Employee},
  store::RepairStore,
};

use crate::{caller::Authenticated, error::ApiError};

/// `GET /customers`
pub async fn list_customers<S>(
  State(store): State<Arc<S>>,
  Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<Customer>>, ApiError>
where
  S: RepairStore,
{
  let customers = store
    .list_customers()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(customers))
}

/// `GET /customers/:id`
pub async fn get_customer<S>(
  State(store): State<Arc<S>>,
  Authenticated(_caller): Authenticated,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Customer>, ApiError>
where
  S: RepairStore,
{
  let Path(id) = path?;
  let customer = store
    .get_customer(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("customer not found: {id}")))?;
  Ok(Json(customer))
}

/// `GET /employees`
pub async fn list_employees<S>(
  State(store): State<Arc<S>>,
  Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<Employee>>, ApiError>
where
  S: RepairStore,
{
  let employees = store
    .list_employees()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(employees))
}

/// `GET /employees/:id`
pub async fn get_employee<S>(
  State(store): State<Arc<S>>,
  Authenticated(_caller): Authenticated,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Employee>, ApiError>
where
  S: RepairStore,
{
  let Path(id) = path?;
  let employee = store
    .get_employee(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("employee not found: {id}")))?;
  Ok(Json(employee))
}
