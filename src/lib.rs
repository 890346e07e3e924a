//! Roster - a local-first employee roster with a terminal dashboard

pub mod commands;
pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod models;
pub mod store;
pub mod tui;
pub mod view;
