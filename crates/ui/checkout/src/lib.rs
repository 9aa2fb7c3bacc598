pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod core;
pub mod errors;
pub mod headless;
pub mod tui;
