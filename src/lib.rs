// src/lib.rs

//! CPS recruitment tracker library
//!
//! Watches the Centro Paula Souza selection portal and the DOE-SP gazette
//! for publications naming one candidate.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod test_support;
