pub mod calendar;
pub mod config;
pub mod error;
pub mod importer;
pub mod startup;
