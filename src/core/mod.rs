//! Core application modules
//!
//! This module contains configuration, constants, logging, the event client
//! and the AI provider it carries.

pub mod client;
pub mod config;
pub mod constants;
pub mod event;
pub mod logging;
pub mod provider;
pub mod providers;
pub mod shared;
