//! Userdesk - In-Memory User Records Behind a Simulated API
//!
//! Two layers:
//! - [`store::UserStore`] owns the records and enforces validation and email
//!   uniqueness, synchronously.
//! - [`gateway::UserGateway`] waits out a simulated network delay, calls the
//!   store, and answers every request with an [`envelope::ApiResponse`].
//!
//! ```text
//! caller ──► UserGateway ──(delay)──► UserStore
//!    ◄── ApiResponse { success, data?, message?, error? } ◄──┘
//! ```
//!
//! The [`http`] module exposes the gateway as JSON routes.

pub mod clock;
pub mod config;
pub mod envelope;
pub mod gateway;
pub mod http;
pub mod store;
pub mod users;

pub use clock::{Clock, SimClock, SystemClock};
pub use config::{ConfigError, GatewayConfig};
pub use envelope::{ApiResponse, ErrorKind};
pub use gateway::UserGateway;
pub use store::{SharedUserStore, UserStore, UserStoreError};
pub use users::{User, UserCreateInput, UserUpdateInput};

/// Application name
pub const APP_NAME: &str = "userdesk";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
