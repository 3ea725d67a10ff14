//! Drafter core library: text-to-diagram extraction, remote model bridge, and notation.
//!
//! The main entry point is [`pipeline::Drafter`], which resolves a diagram
//! remote-first (when an endpoint is configured) and falls back to the local
//! pattern extractor, then attaches Mermaid notation.

pub mod config;
pub mod error;
pub mod extract;
pub mod patterns;
pub mod pipeline;
pub mod remote;
pub mod render;
pub mod types;

pub use drafter_graphs::{ExecutionGraph, GraphError};
