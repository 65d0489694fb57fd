//! Masal Engine: template-driven children's stories.
//!
//! A five-step wizard collects a main character, a theme, moral values and
//! story options; the assembler turns the resulting configuration into a
//! story by filling per-theme paragraph templates, with the length choice
//! deciding how many paragraph tiers are told.

pub mod core;
pub mod schema;
pub mod telemetry;
