//! HRMS Lite: employee directory and daily attendance.
//!
//! The crate holds the shared domain model, the REST service handlers
//! ([`api`], wired up by [`routes`]) and the client side: a remote access
//! layer ([`client`]) with an HTTP and a simulated variant, plus the state
//! stores ([`store`]) a UI renders from.

pub mod api;
pub mod client;
pub mod config;
pub mod directory;
pub mod docs;
pub mod error;
pub mod join;
pub mod model;
pub mod routes;
pub mod store;

pub use client::{HrmsApi, HttpApi, SimulatedApi};
pub use config::Config;
pub use directory::{Directory, SharedDirectory};
pub use error::HrmsError;
pub use store::Stores;
