//! Library Management System dashboard client
//!
//! Client-side data layer for the library management dashboards: fetches the
//! REST resources, aggregates them with partial-failure tolerance, derives
//! the statistics views, scopes them to the session's role, and formats
//! exports. The crate never installs a tracing subscriber; embedding
//! applications bring their own.

pub mod aggregate;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod stats;
pub mod views;

pub use client::{ApiClient, Session};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use models::Role;
pub use views::{Dashboard, Snapshot};
