//! Query-parameter refinements for staff ticket listings.
//!
//! | Key | Value | Effect |
//! |-----|-------|--------|
//! | `status` | `done` | completion date set |
//! | `status` | `all` | no filter |
//! | `status` | `unclaimed` | no employee |
//! | `status` | `inprogress` | employee set, completion date unset |
//! | `status` | anything else | no filter |
//! | `description` | `<s>` | description contains `s` (case-sensitive) |
//!
//! Keys are consulted in [`PRECEDENCE`] order and the first one present
//! decides, so `description` is ignored whenever `status` is given. A key
//! repeated in the query string keeps its last value.

use strum::{Display, EnumString};

use crate::{access::Caller, ticket::ServiceTicket};

/// Raw listing query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
  pub status:      Option<String>,
  pub description: Option<String>,
}

impl ListQuery {
  /// Collect the recognised keys from decoded query-string pairs. Unknown
  /// keys are ignored; a repeated key keeps its last value.
  pub fn from_pairs<I>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (String, String)>,
  {
    let mut query = Self::default();
    for (key, value) in pairs {
      match key.as_str() {
        "status" => query.status = Some(value),
        "description" => query.description = Some(value),
        _ => {}
      }
    }
    query
  }
}

/// Recognised values of the `status` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
  Done,
  All,
  Unclaimed,
  InProgress,
}

/// A query key that can select a refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKey {
  Status,
  Description,
}

/// Query keys in the order they are consulted.
pub const PRECEDENCE: [QueryKey; 2] = [QueryKey::Status, QueryKey::Description];

impl QueryKey {
  fn value(self, query: &ListQuery) -> Option<&str> {
    match self {
      Self::Status => query.status.as_deref(),
      Self::Description => query.description.as_deref(),
    }
  }

  fn filter(self, value: &str) -> TicketFilter {
    match self {
      Self::Status => value
        .parse::<Status>()
        .map(TicketFilter::from)
        .unwrap_or(TicketFilter::Everything),
      Self::Description => TicketFilter::DescriptionContains(value.to_owned()),
    }
  }
}

/// A single refinement over the caller's visible ticket set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketFilter {
  Everything,
  Done,
  Unclaimed,
  InProgress,
  DescriptionContains(String),
}

impl From<Status> for TicketFilter {
  fn from(status: Status) -> Self {
    match status {
      Status::Done => Self::Done,
      Status::All => Self::Everything,
      Status::Unclaimed => Self::Unclaimed,
      Status::InProgress => Self::InProgress,
    }
  }
}

impl TicketFilter {
  /// Pick the refinement selected by `query`.
  pub fn resolve(query: &ListQuery) -> Self {
    PRECEDENCE
      .iter()
      .find_map(|key| key.value(query).map(|v| key.filter(v)))
      .unwrap_or(Self::Everything)
  }

  /// Refinements only apply to staff; customers always get their full set.
  pub fn for_caller(caller: &Caller, query: &ListQuery) -> Self {
    if caller.is_staff() {
      Self::resolve(query)
    } else {
      Self::Everything
    }
  }

  pub fn matches(&self, ticket: &ServiceTicket) -> bool {
    match self {
      Self::Everything => true,
      Self::Done => ticket.is_done(),
      Self::Unclaimed => !ticket.is_claimed(),
      Self::InProgress => ticket.is_claimed() && !ticket.is_done(),
      Self::DescriptionContains(s) => ticket.description.contains(s.as_str()),
    }
  }
}
