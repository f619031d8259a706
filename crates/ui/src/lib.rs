#![forbid(unsafe_code)]

pub mod state;
pub mod vm;

pub use state::{ViewError, ViewState};
