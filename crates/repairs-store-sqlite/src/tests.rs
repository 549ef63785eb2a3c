//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use repairs_core::{
  access::{Caller, TicketScope, can_view},
  filter::{ListQuery, TicketFilter},
  person::{Customer, Employee, NewUser, User},
  store::{RepairStore, StoreError},
  ticket::{NewTicket, ServiceTicket, TicketUpdate},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(username: &str, given: &str, family: &str, is_staff: bool) -> NewUser {
  NewUser {
    username:      username.into(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
    given_name:    given.into(),
    family_name:   family.into(),
    is_staff,
  }
}

async fn customer(s: &SqliteStore, username: &str) -> (User, Customer) {
  let user = s
    .add_user(new_user(username, "Ada", "Lovelace", false))
    .await
    .unwrap();
  let customer = s
    .add_customer(user.user_id, format!("{username} street"))
    .await
    .unwrap();
  (user, customer)
}

async fn employee(s: &SqliteStore, username: &str) -> (User, Employee) {
  let user = s
    .add_user(new_user(username, "Bob", "Ross", true))
    .await
    .unwrap();
  let employee = s
    .add_employee(user.user_id, "plumbing".into())
    .await
    .unwrap();
  (user, employee)
}

async fn ticket(s: &SqliteStore, customer: &Customer, description: &str) -> ServiceTicket {
  s.create_ticket(NewTicket {
    customer_id: customer.id,
    description: description.into(),
    emergency:   false,
  })
  .await
  .unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_user_and_find_credentials() {
  let s = store().await;
  let user = s.add_user(new_user("ada", "Ada", "Lovelace", false)).await.unwrap();

  let creds = s.find_credentials("ada").await.unwrap().unwrap();
  assert_eq!(creds.user, user);
  assert!(creds.password_hash.starts_with("$argon2id$"));

  assert!(s.find_credentials("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  s.add_user(new_user("ada", "Ada", "Lovelace", false)).await.unwrap();
  let err = s
    .add_user(new_user("ada", "Other", "Person", true))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(repairs_core::Error::UsernameTaken(ref u)) if u == "ada"));
  assert!(!err.is_not_found());
}

// ─── Customers & employees ───────────────────────────────────────────────────

#[tokio::test]
async fn customer_full_name_is_derived_from_user() {
  let s = store().await;
  let (user, created) = customer(&s, "ada").await;
  assert_eq!(created.full_name, "Ada Lovelace");
  assert_eq!(created.user_id, user.user_id);

  assert_eq!(s.get_customer(created.id).await.unwrap(), Some(created.clone()));
  assert_eq!(s.customer_for_user(user.user_id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn profile_for_missing_user_fails() {
  let s = store().await;
  let err = s.add_customer(42, "nowhere".into()).await.unwrap_err();
  assert!(matches!(err, Error::Core(repairs_core::Error::UserNotFound(42))));
  assert!(err.is_not_found());
  let err = s.add_employee(42, "welding".into()).await.unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn staff_user_has_no_customer_record() {
  let s = store().await;
  let (user, _) = employee(&s, "bob").await;
  assert!(s.customer_for_user(user.user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_people_in_id_order() {
  let s = store().await;
  customer(&s, "a").await;
  customer(&s, "b").await;
  employee(&s, "e").await;

  let customers = s.list_customers().await.unwrap();
  assert_eq!(customers.len(), 2);
  assert!(customers[0].id < customers[1].id);

  let employees = s.list_employees().await.unwrap();
  assert_eq!(employees.len(), 1);
  assert_eq!(employees[0].full_name, "Bob Ross");
  assert_eq!(s.get_employee(employees[0].id).await.unwrap(), Some(employees[0].clone()));
  assert!(s.get_employee(999).await.unwrap().is_none());
}

// ─── Ticket creation & retrieval ─────────────────────────────────────────────

#[tokio::test]
async fn create_ticket_starts_unassigned_and_incomplete() {
  let s = store().await;
  let (_, c) = customer(&s, "ada").await;

  let created = s
    .create_ticket(NewTicket {
      customer_id: c.id,
      description: "leak".into(),
      emergency:   true,
    })
    .await
    .unwrap();

  assert_eq!(created.customer, c);
  assert_eq!(created.description, "leak");
  assert!(created.emergency);
  assert!(created.employee.is_none());
  assert!(created.date_completed.is_none());

  assert_eq!(s.get_ticket(created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn create_ticket_for_missing_customer_fails() {
  let s = store().await;
  let err = s
    .create_ticket(NewTicket {
      customer_id: 7,
      description: "leak".into(),
      emergency:   false,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(repairs_core::Error::CustomerNotFound(7))));
}

#[tokio::test]
async fn get_missing_ticket_returns_none() {
  let s = store().await;
  assert!(s.get_ticket(12345).await.unwrap().is_none());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn assign_without_date_leaves_completion_untouched() {
  let s = store().await;
  let (_, c) = customer(&s, "ada").await;
  let (_, e) = employee(&s, "bob").await;
  let t = ticket(&s, &c, "leak").await;

  s.update_ticket(t.id, TicketUpdate { employee_id: e.id, date_completed: None })
    .await
    .unwrap();

  let fetched = s.get_ticket(t.id).await.unwrap().unwrap();
  assert_eq!(fetched.employee, Some(e));
  assert!(fetched.date_completed.is_none());
}

#[tokio::test]
async fn assign_and_complete_in_one_update() {
  let s = store().await;
  let (_, c) = customer(&s, "ada").await;
  let (_, e) = employee(&s, "bob").await;
  let t = ticket(&s, &c, "leak").await;

  s.update_ticket(t.id, TicketUpdate {
    employee_id:    e.id,
    date_completed: Some(Some(date(2024, 5, 17))),
  })
  .await
  .unwrap();

  let fetched = s.get_ticket(t.id).await.unwrap().unwrap();
  assert_eq!(fetched.date_completed, Some(date(2024, 5, 17)));

  // A later update without a date keeps it; an explicit null clears it.
  s.update_ticket(t.id, TicketUpdate { employee_id: e.id, date_completed: None })
    .await
    .unwrap();
  let fetched = s.get_ticket(t.id).await.unwrap().unwrap();
  assert_eq!(fetched.date_completed, Some(date(2024, 5, 17)));

  s.update_ticket(t.id, TicketUpdate { employee_id: e.id, date_completed: Some(None) })
    .await
    .unwrap();
  let fetched = s.get_ticket(t.id).await.unwrap().unwrap();
  assert!(fetched.date_completed.is_none());
}

#[tokio::test]
async fn update_missing_ticket_or_employee_fails() {
  let s = store().await;
  let (_, c) = customer(&s, "ada").await;
  let (_, e) = employee(&s, "bob").await;
  let t = ticket(&s, &c, "leak").await;

  let err = s
    .update_ticket(999, TicketUpdate { employee_id: e.id, date_completed: None })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(repairs_core::Error::TicketNotFound(999))));

  let err = s
    .update_ticket(t.id, TicketUpdate { employee_id: 999, date_completed: None })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(repairs_core::Error::EmployeeNotFound(999))));
  assert!(err.is_not_found());
  assert_eq!(err.to_string(), "employee not found: 999");

  // Nothing was written by the failed update.
  assert!(s.get_ticket(t.id).await.unwrap().unwrap().employee.is_none());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_is_permanent() {
  let s = store().await;
  let (_, c) = customer(&s, "ada").await;
  let t = ticket(&s, &c, "leak").await;

  s.delete_ticket(t.id).await.unwrap();
  assert!(s.get_ticket(t.id).await.unwrap().is_none());

  let err = s.delete_ticket(t.id).await.unwrap_err();
  assert!(err.is_not_found());
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// Four tickets, one per (claimed, done) combination, for two customers.
async fn seeded() -> (SqliteStore, Caller, Caller, Caller) {
  let s = store().await;
  let (ada, c1) = customer(&s, "ada").await;
  let (grace, c2) = customer(&s, "grace").await;
  let (bob, e) = employee(&s, "bob").await;

  let _open = ticket(&s, &c1, "Kitchen leak").await;
  let claimed = ticket(&s, &c1, "Broken window").await;
  let done = ticket(&s, &c2, "leaky faucet").await;
  let claimed_done = ticket(&s, &c2, "Door hinge").await;

  s.update_ticket(claimed.id, TicketUpdate { employee_id: e.id, date_completed: None })
    .await
    .unwrap();
  s.update_ticket(claimed_done.id, TicketUpdate {
    employee_id:    e.id,
    date_completed: Some(Some(date(2024, 1, 2))),
  })
  .await
  .unwrap();

  // Completion without assignment is allowed: set a date, then point the
  // employee column back at nothing by hand.
  s.update_ticket(done.id, TicketUpdate {
    employee_id:    e.id,
    date_completed: Some(Some(date(2024, 1, 3))),
  })
  .await
  .unwrap();
  let done_id = done.id;
  s.conn
    .call(move |conn| {
      conn.execute(
        "UPDATE service_tickets SET employee_id = NULL WHERE ticket_id = ?1",
        rusqlite::params![done_id],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  (s, Caller::from_user(&bob), Caller::from_user(&ada), Caller::from_user(&grace))
}

fn ids(tickets: &[ServiceTicket]) -> Vec<i64> { tickets.iter().map(|t| t.id).collect() }

#[tokio::test]
async fn customer_lists_only_own_tickets() {
  let (s, staff, ada, grace) = seeded().await;
  let all = s
    .list_tickets(TicketScope::for_caller(&staff), TicketFilter::Everything)
    .await
    .unwrap();
  assert_eq!(all.len(), 4);

  for caller in [&staff, &ada, &grace] {
    let listed = s
      .list_tickets(TicketScope::for_caller(caller), TicketFilter::Everything)
      .await
      .unwrap();
    let expected: Vec<_> = all
      .iter()
      .filter(|t| can_view(&caller.identity, caller.role, t))
      .cloned()
      .collect();
    assert_eq!(listed, expected);
  }

  let ada_tickets = s
    .list_tickets(TicketScope::for_caller(&ada), TicketFilter::Everything)
    .await
    .unwrap();
  assert_eq!(ada_tickets.len(), 2);
  assert!(ada_tickets.iter().all(|t| t.customer.user_id == ada.identity.user_id));
}

#[tokio::test]
async fn sql_filters_agree_with_in_memory_filters() {
  let (s, staff, ..) = seeded().await;
  let everything = TicketScope::for_caller(&staff);
  let all = s.list_tickets(everything.clone(), TicketFilter::Everything).await.unwrap();

  for filter in [
    TicketFilter::Everything,
    TicketFilter::Done,
    TicketFilter::Unclaimed,
    TicketFilter::InProgress,
    TicketFilter::DescriptionContains("leak".into()),
    TicketFilter::DescriptionContains("Leak".into()),
    TicketFilter::DescriptionContains(String::new()),
  ] {
    let listed = s.list_tickets(everything.clone(), filter.clone()).await.unwrap();
    let expected: Vec<_> = all.iter().filter(|t| filter.matches(t)).cloned().collect();
    assert_eq!(ids(&listed), ids(&expected), "filter {filter:?}");
  }
}

#[tokio::test]
async fn status_partitions_over_seeded_tickets() {
  let (s, staff, ..) = seeded().await;
  let count = |f: TicketFilter| {
    let s = s.clone();
    let scope = TicketScope::for_caller(&staff);
    async move { s.list_tickets(scope, f).await.unwrap().len() }
  };

  assert_eq!(count(TicketFilter::Done).await, 2);
  assert_eq!(count(TicketFilter::Unclaimed).await, 2);
  assert_eq!(count(TicketFilter::InProgress).await, 1);
  assert_eq!(
    count(TicketFilter::resolve(&ListQuery {
      status:      Some("bogus".into()),
      description: Some("leak".into()),
    }))
    .await,
    4
  );
}

#[tokio::test]
async fn description_filter_is_case_sensitive() {
  let (s, staff, ..) = seeded().await;
  let listed = s
    .list_tickets(
      TicketScope::for_caller(&staff),
      TicketFilter::DescriptionContains("leak".into()),
    )
    .await
    .unwrap();
  let descriptions: Vec<_> = listed.iter().map(|t| t.description.as_str()).collect();
  assert_eq!(descriptions, ["Kitchen leak", "leaky faucet"]);
}
