//! Persistence - story storage

mod memory_store;

pub use memory_store::InMemoryStoryStore;
