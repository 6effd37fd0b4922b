pub mod chunk;
pub mod encounter;
pub mod growth;
pub mod health;
pub mod srs;
pub mod topic;

pub use chunk::{ChunkRecord, ChunkStatus};
pub use encounter::{Encounter, Outcome, StarRating};
pub use growth::{GrowthStage, growth_stage};
pub use health::{calculate_topic_health, health_from_elapsed_days};
pub use srs::calculate_next_review;
pub use topic::{Topic, TopicView};
