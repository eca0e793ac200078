pub mod api;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod models;
pub mod processor;
