//! Value records collected by the wizard and consumed by the assembler.

pub mod character;
pub mod config;
pub mod item;
pub mod moral;
pub mod theme;
