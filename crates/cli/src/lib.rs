//! Stepscribe CLI
//!
//! Command-line front end for compiling natural-language steps into
//! Playwright Test scripts.

pub mod commands;
pub mod output;
