pub mod analytic;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod events;
pub mod export;
pub mod models;
pub mod output;
pub mod state;
