#![forbid(unsafe_code)]

//! Storage adapters for the quiz engine: repository traits, an in-memory
//! implementation for tests and prototyping, and the `SQLite` backend.

pub mod repository;
pub mod sqlite;
