pub mod app;
pub mod builtin_providers;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod credentials;
pub mod engine;
pub mod message;
pub mod providers;
pub mod selection;
