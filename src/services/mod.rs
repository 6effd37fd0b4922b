pub mod maintenance;
pub mod session;

pub use maintenance::decay_overdue_chunks;
pub use session::{
    BatchReport, ChunkFailure, SessionResult, record_batch_encounters, session_encounters,
};
