//! Pagination module
//!
//! Collects every page of a search into one [`AggregatedResult`].
//!
//! # Overview
//!
//! [`aggregate_all`] drives a [`PageAccumulator`] over an injected
//! [`PageFetcher`]. The fetcher decides the query dialect (structured filter
//! or query-language string); the loop itself is the same for both.
//!
//! [`AggregatedResult`]: crate::models::AggregatedResult

mod aggregate;
mod types;

pub use aggregate::aggregate_all;
pub use types::{AggregationState, NextPage, PageAccumulator, PageFetcher, FIRST_PAGE};
