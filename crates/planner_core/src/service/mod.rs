//! Use-case services for planner callers.
//!
//! # Responsibility
//! - Orchestrate repository calls and engine functions into use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod auth_service;
pub mod planner_service;
