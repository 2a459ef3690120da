//! Evently event management API.
//!
//! This crate ships the `event-api` binary. The library surface exists so
//! integration tests can build the router against in-process state.
//!
//! Layers, from the outside in:
//! - [`api`]: axum routes, extractors and the error body
//! - [`service`]: account and event workflows
//! - [`policy`] and [`validation`]: pure decision functions
//! - [`store`]: in-memory user and event records
//! - [`auth`]: password hashing, session tokens, identity resolution
//! - [`notify`]: best-effort registration confirmations

pub mod api;
pub mod auth;
pub mod config;
pub mod model;
pub mod notify;
pub mod policy;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;
