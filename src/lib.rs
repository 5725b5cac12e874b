pub mod client;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod generator;
pub mod runner;
pub mod telemetry;
