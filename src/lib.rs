//! # Onboarding Harness
//!
//! A local-first knowledge retrieval service for developer onboarding
//! assistants.
//!
//! Company knowledge (repositories, wiki pages, error catalogs, policies,
//! team directories) is imported from JSON files into SQLite and exposed
//! as relevance-ranked tools. The tools and a set of agent personas are
//! served over HTTP and the `onboard` CLI; the search logic itself lives in
//! the `onboarding-core` crate.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌───────────────┐
//! │ knowledge/  │──▶│   import    │──▶│    SQLite     │
//! │ <cat>/*.json│   │ hash + skip │   │json_documents │
//! └─────────────┘   └─────────────┘   └──────┬────────┘
//!                                            │ DocumentStore
//!                                            ▼
//!                                   ┌─────────────────┐
//!                                   │ onboarding-core │
//!                                   │  ops + ranking  │
//!                                   └────────┬────────┘
//!                      ┌─────────────────────┤
//!                      ▼                     ▼
//!                 ┌──────────┐         ┌──────────┐
//!                 │   CLI    │         │   HTTP   │
//!                 │(onboard) │         │ tools +  │
//!                 └──────────┘         │  agents  │
//!                                      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! onboard init                     # create database
//! onboard import --root ./knowledge
//! onboard find kubernetes
//! onboard tool call search_codebase --param query=auth
//! onboard serve                    # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite `DocumentStore` with lazy reconnect |
//! | [`import`] | JSON knowledge import |
//! | [`traits`] | `Tool` trait, built-in knowledge tools, registry |
//! | [`agents`] | Agent personas and registry |
//! | [`server`] | HTTP server |

pub mod agents;
pub mod config;
pub mod db;
pub mod import;
pub mod migrate;
pub mod server;
pub mod sqlite_store;
pub mod traits;
