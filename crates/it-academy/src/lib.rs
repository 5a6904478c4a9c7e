pub mod activities;
pub mod catalog;
pub mod config;
pub mod error;
pub mod pages;
pub mod registration;
pub mod telemetry;
