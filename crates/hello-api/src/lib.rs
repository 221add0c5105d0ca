//! `hello-api` — a minimal versioned REST API service backed by PostgreSQL.
//!
//! The crate is a template: one CRUD-ish resource (`hellos`), layered
//! configuration, structured request logging, and a data-access layer that is
//! swappable between a real connection pool and an in-memory stub without
//! touching handler code. Two binaries share this library: `api` (the HTTP
//! server) and `migrate` (applies schema migrations and exits).

pub mod config;
pub mod dao;
pub mod db;
pub mod models;
pub mod server;
pub mod telemetry;
