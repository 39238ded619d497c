//! Caseplant Core Types
//!
//! This crate provides the diagram model shared by the Caseplant parser and
//! renderer:
//!
//! - **Model**: actors, modules and their use cases ([`model`] module)
//! - **Relations**: typed relations and the closed operator table ([`relation`] module)
//!
//! A [`model::Diagram`] is a plain value. It is built once per parse and owned
//! by whoever called the parser; nothing in this crate keeps global state.

pub mod model;
pub mod relation;
