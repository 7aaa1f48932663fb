// Library surface for the preview binary and integration tests.
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod observability;
pub mod reasoning;
pub mod recency;
pub mod relevance;
pub mod scoring;
pub mod selection;
pub mod strategist;
pub mod telemetry;
