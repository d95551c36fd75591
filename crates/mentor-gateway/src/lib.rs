//! HTTP gateway to the FCDS Mentor backend.
//!
//! Implements `mentor_core::gateway::ApiGateway` over `reqwest`.

pub mod client;
mod dto;

pub use client::HttpGateway;
