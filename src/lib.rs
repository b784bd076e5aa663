//! Bookstore Client Library
//!
//! View controllers for an online bookstore front end, built on a single
//! remote-call / view-state reconciliation pattern, plus an in-memory
//! reference gateway serving the same API.

// Client core
pub mod controllers;
pub mod gateway;
pub mod pagination;
pub mod session;
pub mod view;

// Reference gateway
pub mod backend;

// Infrastructure
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod router;
