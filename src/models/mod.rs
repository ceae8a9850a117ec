//! Domain models for the feedback board.
//!
//! # Core Concepts
//!
//! - [`Board`]: the single long-lived aggregate, keyed by a constant page
//!   name. Holds every submitted feedback and survey entry in insertion
//!   order.
//! - [`FeedbackEntry`] / [`SurveyEntry`]: immutable once stored; the only
//!   mutation the board supports is removal by id.
//! - [`RatingItem`]: one answered question within a survey, kept in the
//!   fixed question order.
//! - [`AdminCredential`]: the administrator account, created once at
//!   startup and never modified afterward.

mod board;
mod credential;
mod feedback;
mod survey;

pub use board::*;
pub use credential::*;
pub use feedback::*;
pub use survey::*;
