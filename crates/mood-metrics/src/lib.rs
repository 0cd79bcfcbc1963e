pub mod catalog;
pub mod checkins;
pub mod coerce;
pub mod config;
pub mod error;
pub mod profiles;
pub mod scoring;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod test_support;
