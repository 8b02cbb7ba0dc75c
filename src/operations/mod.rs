//! Operations module
//! 
//! Side-effecting work performed by command handlers

pub mod shell;

pub use shell::*;
