#![forbid(unsafe_code)]

pub mod principal;

pub use principal::{align_to_principal_axis, Alignment};
