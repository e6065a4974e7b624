//! Interactive Gantt timeline engine.
//!
//! The engine is a set of pure, display-independent pieces:
//!
//! - [`model::TimelineViewport`] maps calendar days to pixels for a zoom level.
//! - [`layout::tree`] flattens parent/child items into ordered rows.
//! - [`layout::lanes`] packs overlapping items into lanes for dense views.
//! - [`layout::dependencies`] routes predecessor connectors between bars.
//! - [`interaction::DragEngine`] turns pointer events into draft dates and commits.
//! - [`interaction::RangeController`] owns the visible window and zoom.
//! - [`interaction::ScrollSync`] keeps the header ruler aligned with the body.
//!
//! [`layout::compute_layout`] ties them together into a [`layout::TimelineGeometry`]
//! that any rendering surface can paint.

pub mod config;
pub mod error;
pub mod interaction;
pub mod io;
pub mod layout;
pub mod model;

pub use error::{Error, Result};
