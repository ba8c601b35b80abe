//! A minimal shell built on fork, exec, dup2 and pipes.
//!
//! The [`exec`] module holds the execution engine: it walks a parsed
//! [`exec::ast::Command`] tree and returns one [`exec::status::Status`].
//! The remaining modules make up the `minish` driver around it.

pub mod cli;
pub mod config;
pub mod exec;
pub mod handlers;
pub mod logger;
