//! Data models for parsed commands and parser configuration.

pub mod command;
pub mod config;
