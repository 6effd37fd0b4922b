pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod services;

pub use database::{ChunkStore, MemoryChunkStore, SqliteChunkStore};
pub use engine::ProgressEngine;
pub use error::{ExportError, RatingError, StoreError};
pub use models::{
    ChunkRecord, ChunkStatus, GrowthStage, Outcome, StarRating, Topic, TopicView,
};
pub use services::{BatchReport, SessionResult};
