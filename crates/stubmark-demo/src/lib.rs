#![forbid(unsafe_code)]

//! stubmark demo: a directory listing with placeholder badges.

pub mod browser;
pub mod cli;
