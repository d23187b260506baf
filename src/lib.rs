//! Fingerspell Library
//!
//! Core modules for the Fingerspell ASL fingerspelling service.

pub mod asr;
pub mod audio;
pub mod config;
pub mod core;
pub mod error;
pub mod glyphs;
pub mod server;
