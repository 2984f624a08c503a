//! Tubely Database Library
//!
//! The ingestion pipeline only needs to read a video record and write it back.
//! This crate defines that contract ([`VideoRepository`]) and an in-memory
//! implementation used by the API server and tests.

pub mod memory;
pub mod repository;

pub use memory::InMemoryVideoRepository;
pub use repository::{RepositoryError, RepositoryResult, VideoRepository};
