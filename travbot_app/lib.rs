pub mod app;
pub mod command_handlers;
pub mod config;
pub mod cqrs;
pub mod driver;
pub mod inspector;
pub mod locators;
pub mod parsers;
pub mod queries_handlers;
pub mod screens;
pub mod session;
pub mod timers;
pub mod workflow;

mod executor;
mod preconditions;
mod resolver;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
