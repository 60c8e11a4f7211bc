//! Adapters implementing domain ports.
//!
//! Infrastructure implementations of the traits defined in the ports module:
//! model persistence and terminal rendering.

pub mod ascii_renderer;
pub mod in_memory_repository;
pub mod msgpack_repository;

pub use ascii_renderer::AsciiRenderer;
pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
