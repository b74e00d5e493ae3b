//! ComplexApp client library.
//!
//! Page controllers for a social-posting site (registration, posts, profiles,
//! live search) driven by pure reducers, debounced validation, and cancellable
//! requests against the ComplexApp HTTP API, with maud rendering of every page.

// Allow raw string hashes in HTML assertions
#![allow(clippy::needless_raw_string_hashes)]

pub mod api;
pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod pages;
pub mod router;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod store;

pub use app::{App, Page};
pub use error::ClientError;
