//! Facepack CLI library.

pub mod cli;
pub mod commands;
pub mod io;
pub mod parallel;
