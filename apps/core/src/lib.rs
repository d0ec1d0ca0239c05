pub mod action_executor;
pub mod blocklist;
pub mod config;
pub mod contract;
pub mod document_index;
pub mod index_service;
pub mod logging;
pub mod math_eval;
pub mod model;
pub mod platform;
pub mod program_index;
pub mod prompt;
pub mod query_router;
pub mod runtime;
pub mod search;
pub mod settings_store;
pub mod text;
pub mod transport;
pub mod window_switcher;

#[cfg(test)]
extern crate self as quicknav_core;
