pub mod db;
pub mod memory;
pub mod store;

pub use db::SqliteChunkStore;
pub use memory::MemoryChunkStore;
pub use store::ChunkStore;
