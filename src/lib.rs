//! Chat responder — automated replies for a WhatsApp number.

pub mod auth;
pub mod channels;
pub mod config;
pub mod error;
pub mod gateway;
pub mod knowledge;
pub mod pipeline;
pub mod runner;
pub mod runtime;
