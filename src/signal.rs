//! Signal processing.

pub mod filter;
