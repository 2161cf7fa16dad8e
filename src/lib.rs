//! A small food ordering service.
//!
//! The server exposes the menu served at the current time of day and a single shared order that
//! clients fill, review and confirm. State lives in SQLite, requests are served by a hand written
//! HTTP/1.1 server on a thread pool.

pub mod api;
pub mod cart;
pub mod cli;
pub mod config;
pub mod database;
pub mod endpoints;
pub mod errors;
pub mod http;
pub mod menu;
pub mod routes;
pub mod threadpool;
pub mod validation;
