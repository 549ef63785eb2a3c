//! Account provisioning for the admin subcommands.
//!
//! Customers and employees are never created over HTTP. These helpers hash
//! the password, create the user, and attach the profile.

use anyhow::Context as _;
use repairs_core::{
  person::{Customer, Employee, NewUser, User},
  store::RepairStore,
};

use crate::auth::hash_password;

/// Identity fields shared by both kinds of account.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub username:    String,
  pub given_name:  String,
  pub family_name: String,
  pub password:    String,
}

async fn add_user<S: RepairStore>(
  store: &S,
  account: NewAccount,
  is_staff: bool,
) -> anyhow::Result<User> {
  let password_hash = hash_password(&account.password)
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;

  store
    .add_user(NewUser {
      username: account.username.clone(),
      password_hash,
      given_name: account.given_name,
      family_name: account.family_name,
      is_staff,
    })
    .await
    .with_context(|| format!("failed to create user {:?}", account.username))
}

/// Create a non-staff user with a customer profile.
pub async fn add_customer<S: RepairStore>(
  store: &S,
  account: NewAccount,
  address: String,
) -> anyhow::Result<Customer> {
  let user = add_user(store, account, false).await?;
  let customer = store
    .add_customer(user.user_id, address)
    .await
    .context("failed to create customer profile")?;
  tracing::info!(username = %user.username, customer = customer.id, "customer added");
  Ok(customer)
}

/// Create a staff user with an employee profile.
pub async fn add_employee<S: RepairStore>(
  store: &S,
  account: NewAccount,
  specialty: String,
) -> anyhow::Result<Employee> {
  let user = add_user(store, account, true).await?;
  let employee = store
    .add_employee(user.user_id, specialty)
    .await
    .context("failed to create employee profile")?;
  tracing::info!(username = %user.username, employee = employee.id, "employee added");
  Ok(employee)
}
