pub use self::catalog::*;

mod catalog;
pub mod service;
pub mod transfer;

#[cfg(test)]
mod fake;
