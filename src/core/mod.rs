pub mod assembler;
pub mod catalog;
pub mod format;
pub mod session;
pub mod summary;
pub mod template;
pub mod wizard;
