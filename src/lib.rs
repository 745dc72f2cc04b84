//! Helpdesk Sim - Training ticket simulation engine
//!
//! Tracks how close a trainee support agent is getting to the fix on an
//! AI-simulated helpdesk ticket and decides when the simulated end user
//! should drop a hint.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
