//! pathscope core library: fetch, parse, classify, score, interactome,
//! enrichment, and renderers.
//!
//! The main entry point is [`pipeline::PathwayPipeline`], which runs the
//! Fetch → Parse → Classify → Score → Analyze pipeline for one
//! (condition, pathway) pair over a [`fetch::RecordSource`].

pub mod analyze;
pub mod classify;
pub mod conditions;
pub mod config;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod score;
pub mod table;
pub mod types;
