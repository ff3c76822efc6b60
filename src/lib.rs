// src/lib.rs
#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod diff;
pub mod error;
pub mod export;
pub mod ident;
pub mod model;
pub mod progress;
pub mod runner;
pub mod scrape;
pub mod specs;
pub mod store;
pub mod tsv;
