#![forbid(unsafe_code)]

pub mod ply;

pub use ply::{read_ply, write_ply, write_ply_binary, LoadError, SaveError};
