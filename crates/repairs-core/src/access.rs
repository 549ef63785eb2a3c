//! Role-based ticket visibility.
//!
//! Staff see every ticket. Everyone else sees only the tickets whose customer
//! is their own user. [`can_view`] is the policy; [`TicketScope`] is the same
//! policy in a form a store backend can push down into its query.

use serde::{Deserialize, Serialize};

use crate::{person::User, ticket::ServiceTicket};

/// The privilege level of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Staff,
  Customer,
}

impl Role {
  pub fn from_staff_flag(is_staff: bool) -> Self {
    if is_staff { Self::Staff } else { Self::Customer }
  }

  pub fn is_staff(self) -> bool { matches!(self, Self::Staff) }
}

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub user_id:  i64,
  pub username: String,
}

/// The authenticated caller of a single operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
  pub identity: Identity,
  pub role:     Role,
}

impl Caller {
  pub fn from_user(user: &User) -> Self {
    Self {
      identity: Identity {
        user_id:  user.user_id,
        username: user.username.clone(),
      },
      role:     Role::from_staff_flag(user.is_staff),
    }
  }

  pub fn is_staff(&self) -> bool { self.role.is_staff() }
}

/// Whether `identity`, acting with `role`, may see `ticket`.
pub fn can_view(identity: &Identity, role: Role, ticket: &ServiceTicket) -> bool {
  match role {
    Role::Staff => true,
    Role::Customer => ticket.customer.user_id == identity.user_id,
  }
}

/// The set of tickets a caller may list.
///
/// Membership is decided by [`can_view`]; [`owner`](Self::owner) is the same
/// rule reduced to the column a backend can filter on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketScope {
  caller: Caller,
}

impl TicketScope {
  pub fn for_caller(caller: &Caller) -> Self {
    Self {
      caller: caller.clone(),
    }
  }

  /// The user whose tickets bound the scope, or `None` when every ticket is
  /// admitted.
  pub fn owner(&self) -> Option<i64> {
    (!self.caller.is_staff()).then_some(self.caller.identity.user_id)
  }

  pub fn admits(&self, ticket: &ServiceTicket) -> bool {
    can_view(&self.caller.identity, self.caller.role, ticket)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::person::Customer;

  fn ticket_owned_by(user_id: i64) -> ServiceTicket {
    ServiceTicket {
      id:             1,
      description:    "leak".into(),
      emergency:      false,
      date_completed: None,
      customer:       Customer {
        id: 10 + user_id,
        user_id,
        full_name: "Some One".into(),
        address: "1 Main St".into(),
      },
      employee:       None,
    }
  }

  fn caller(user_id: i64, is_staff: bool) -> Caller {
    Caller::from_user(&User {
      user_id,
      username: format!("user{user_id}"),
      given_name: "Some".into(),
      family_name: "One".into(),
      is_staff,
    })
  }

  #[test]
  fn staff_sees_every_ticket() {
    let staff = caller(1, true);
    for owner in [1, 2, 3] {
      assert!(can_view(&staff.identity, staff.role, &ticket_owned_by(owner)));
    }
  }

  #[test]
  fn customer_sees_only_own_tickets() {
    let customer = caller(2, false);
    assert!(can_view(&customer.identity, customer.role, &ticket_owned_by(2)));
    assert!(!can_view(&customer.identity, customer.role, &ticket_owned_by(3)));
  }

  #[test]
  fn scope_agrees_with_can_view() {
    let tickets: Vec<_> = (1..=4).map(ticket_owned_by).collect();
    for c in [caller(1, true), caller(2, false), caller(4, false), caller(9, false)] {
      let scope = TicketScope::for_caller(&c);
      for t in &tickets {
        assert_eq!(scope.admits(t), can_view(&c.identity, c.role, t));
      }
    }
  }

  #[test]
  fn scope_owner_follows_role() {
    assert_eq!(TicketScope::for_caller(&caller(5, true)).owner(), None);
    assert_eq!(TicketScope::for_caller(&caller(5, false)).owner(), Some(5));
  }

  #[test]
  fn owner_agrees_with_admits() {
    let tickets: Vec<_> = (1..=4).map(ticket_owned_by).collect();
    for c in [caller(1, true), caller(2, false), caller(9, false)] {
      let scope = TicketScope::for_caller(&c);
      for t in &tickets {
        let by_owner = scope.owner().is_none_or(|id| t.customer.user_id == id);
        assert_eq!(by_owner, scope.admits(t));
      }
    }
  }
}
