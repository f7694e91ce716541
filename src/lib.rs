//! funnelboard - marketing analytics dashboard backend
//!
//! Aggregates ad-spend and call-inquiry records into dashboard views
//! (overview, campaign performance, call breakdowns, conversion funnel),
//! gates and computes a linear spend forecast, and exposes both over HTTP.
//!
//! # Architecture
//! - `storage`: record repository trait, SeaORM and in-memory backends
//! - `analytics`: pure aggregation, funnel, forecast and search engines
//! - `cache`: computed-view cache with per-collection invalidation
//! - `services`: dashboard reads and validated record mutations
//! - `api`: HTTP handlers and routes
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: startup wiring, server and report modes
//! - `system`: logging

pub mod analytics;
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
