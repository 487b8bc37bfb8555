//! EchoLab Core — domain types, data layer, indicators, RNG, query grammar.
//!
//! This crate contains everything below the simulation pipeline:
//! - Domain types (bars, price tables with named indicator columns)
//! - Data acquisition (Yahoo Finance provider) and the Parquet cache
//! - Rolling-window technical indicators
//! - Deterministic RNG hierarchy (hash-derived sub-seeds)
//! - The fixed query grammar

pub mod data;
pub mod domain;
pub mod indicators;
pub mod query;
pub mod rng;
