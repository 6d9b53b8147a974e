//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod plan_trip;
pub mod search_flights;

pub use plan_trip::{PlanTripParams, PlanTripTool};
pub use search_flights::{FlightSearchResult, SearchFlightsParams, SearchFlightsTool};
