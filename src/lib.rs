pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod events;
pub mod fetch;
pub mod input;
pub mod logging;
pub mod page;
pub mod urls;
