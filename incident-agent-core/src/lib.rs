#![doc = "incident-agent-core: core logic library for the incident agent."]

//! This crate contains all logic and data models for incident response
//! automation: composing runbook entries, publishing them to a knowledge
//! base with count verification, filing incident tickets, notifying the
//! on-call engineer and assembling search queries.
//! CLI argument parsing and config file loading live in the
//! `incident-agent` crate.

pub mod compose;
pub mod contract;
pub mod error;
pub mod notify;
pub mod orchestrate;
pub mod query;
pub mod synchronise;
pub mod ticket;
pub mod token;
pub mod verify;
