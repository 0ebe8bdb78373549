//! Command handlers

pub mod add;
pub mod config;
pub mod serve;
pub mod show;
