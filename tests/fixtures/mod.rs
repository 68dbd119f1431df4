//! Test fixtures for trip-mapper.
//!
//! Provides real Tennessee city coordinates for end-to-end scenarios.

pub mod tennessee_locations;
