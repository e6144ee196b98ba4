//! iprkit - database plugins and input helpers for property calculations
//!
//! This library provides the pieces of the calculation framework that sit
//! between user input and storage.
//!
//! # Modules
//!
//! - [`config`]: Configuration management and serialization
//! - [`databases`]: Database discovery and plugin loading
//! - [`input`]: Input parameter helpers (default unit labels)

pub mod config;
pub mod databases;
pub mod input;
