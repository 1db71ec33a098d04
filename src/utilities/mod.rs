//! Shared utilities: configuration and string coercion.

pub mod config;
pub mod string_utils;
