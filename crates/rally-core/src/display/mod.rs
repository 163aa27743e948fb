//! Display formatting for models, collections and operation results.
//!
//! Domain models implement `Display` directly (see [`models`]); lists and
//! operation outcomes are formatted through wrapper types. Every formatter
//! produces markdown, which the CLI renders for the terminal and the MCP
//! server returns as-is.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers        │    │   Markdown      │
//! │ (Activity, Plan)│───▶│ (Plans, Create…)│───▶│ (Terminal/MCP)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: [`Activities`], [`Plans`] and [`Preferences`] wrappers
//! - [`results`]: [`CreateResult`], [`UpdateResult`], [`DeleteResult`]
//! - [`status`]: [`OperationStatus`] confirmation lines
//! - [`datetime`]: [`LocalDateTime`]
//!
//! # Examples
//!
//! ```rust
//! use rally_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Preference saved");
//! assert_eq!(status.to_string(), "Success: Preference saved\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Activities, Plans, Preferences};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
