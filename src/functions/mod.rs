//! Centralized mathematical function registry
//!
//! This module is the single source of truth for the built-in functions an
//! integrand may call: their names, arity, numeric kernels and LaTeX commands.

pub(crate) mod definitions;
pub(crate) mod registry;

pub(crate) use registry::Registry;
