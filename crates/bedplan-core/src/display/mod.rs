//! Markdown rendering of planning results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]).
//! Wrapper types cover the cases a bare model cannot: collections with an
//! empty-state message, and schedules whose weeks should be shown with
//! calendar dates.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Calendar and    │    │    Markdown     │
//! │  (Plan, Retro)  │───▶│ collection      │───▶│     output      │
//! │                 │    │ wrappers        │    │   (terminal)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`calendar`]: week labels and the [`Calendar`] wrapper
//! - [`collections`]: [`Crops`] and [`Commitments`]
//! - [`datetime`]: timestamp formatting
//! - [`models`]: Display implementations for domain models

pub mod calendar;
pub mod collections;
pub mod datetime;
pub mod models;

pub use calendar::{iso_week_monday, Calendar, WeekLabel};
pub use collections::{Commitments, Crops};
pub use datetime::LocalDateTime;
