//! SQL schema for the repairs SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    username       TEXT    NOT NULL UNIQUE,
    password_hash  TEXT    NOT NULL,   -- argon2 PHC string
    given_name     TEXT    NOT NULL,
    family_name    TEXT    NOT NULL,
    is_staff       INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS customers (
    customer_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL UNIQUE REFERENCES users(user_id) ON DELETE CASCADE,
    address      TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS employees (
    employee_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL UNIQUE REFERENCES users(user_id) ON DELETE CASCADE,
    specialty    TEXT    NOT NULL
);

-- Deleting a ticket removes the row; there is no tombstone.
CREATE TABLE IF NOT EXISTS service_tickets (
    ticket_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id     INTEGER NOT NULL REFERENCES customers(customer_id) ON DELETE CASCADE,
    employee_id     INTEGER REFERENCES employees(employee_id) ON DELETE SET NULL,
    description     TEXT    NOT NULL,
    emergency       INTEGER NOT NULL,
    date_completed  TEXT               -- YYYY-MM-DD or NULL
);

CREATE INDEX IF NOT EXISTS tickets_customer_idx ON service_tickets(customer_id);
CREATE INDEX IF NOT EXISTS tickets_employee_idx ON service_tickets(employee_id);

PRAGMA user_version = 1;
";
