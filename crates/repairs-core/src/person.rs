//! Users and the two profiles hanging off them: customers and employees.
//!
//! A [`User`] is the authentication identity. Customers and employees each
//! own exactly one user and add a single attribute of their own. Their
//! display name is derived from the user's two name fields.

use serde::{Deserialize, Serialize};

/// Display name derived from a given and a family name.
pub fn full_name(given: &str, family: &str) -> String {
  format!("{given} {family}")
}

/// An authentication identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:     i64,
  pub username:    String,
  pub given_name:  String,
  pub family_name: String,
  pub is_staff:    bool,
}

/// Input for creating a [`User`]. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub given_name:    String,
  pub family_name:   String,
  pub is_staff:      bool,
}

/// A stored user together with its password hash. Never serialised.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user:          User,
  pub password_hash: String,
}

/// A customer profile, as embedded in ticket payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
  pub id:        i64,
  #[serde(skip)]
  pub user_id:   i64,
  pub full_name: String,
  pub address:   String,
}

/// An employee profile, as embedded in ticket payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub id:        i64,
  #[serde(skip)]
  pub user_id:   i64,
  pub specialty: String,
  pub full_name: String,
}
