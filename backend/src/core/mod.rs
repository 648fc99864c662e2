//! Core simulation infrastructure

pub mod time;
