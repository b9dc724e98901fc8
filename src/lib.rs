//! Event registration backend.
//!
//! Accepts multipart registrations (identity fields plus CNIC images), appends
//! them to a CSV log under the content root, keeps an `.xlsx` mirror of that
//! log and lists everything back as JSON.
//!
//! ## Endpoints
//!
//! - `GET /` - liveness banner
//! - `POST /register` - submit a registration
//! - `GET /view-registrations` - every stored registration, oldest first

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod registrations;
pub mod state;
pub mod storage;
pub mod telemetry;

pub use app::build_app;
pub use config::{AppConfig, FormVariant};
pub use error::AppError;
pub use state::AppState;
