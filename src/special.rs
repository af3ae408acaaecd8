//! Special functions.

pub mod elliptic;
