//! JSON export/import of a learner's chunk history.
//! Provides functionality to save a progress snapshot to disk and load it back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::database::ChunkStore;
use crate::error::{ExportError, StoreError};
use crate::models::ChunkRecord;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub learner_id: String,
    pub exported_at: DateTime<Utc>,
    pub chunks: Vec<ChunkRecord>,
}

/// Reads every chunk the learner has and writes it as pretty JSON.
pub fn export_snapshot<S: ChunkStore>(
    store: &S,
    learner_id: &str,
    now: DateTime<Utc>,
    path: impl AsRef<Path>,
) -> Result<ProgressSnapshot, ExportError> {
    let snapshot = ProgressSnapshot {
        learner_id: learner_id.to_string(),
        exported_at: now,
        chunks: store.list_chunks(learner_id)?,
    };
    let json_string = serde_json::to_string_pretty(&snapshot)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(json_string.as_bytes())?;

    tracing::info!(
        learner_id,
        chunks = snapshot.chunks.len(),
        path = %path.as_ref().display(),
        "progress exported"
    );
    Ok(snapshot)
}

/// Loads a snapshot written by `export_snapshot`.
pub fn import_snapshot(path: impl AsRef<Path>) -> Result<ProgressSnapshot, ExportError> {
    let mut file = File::open(path.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let snapshot: ProgressSnapshot = serde_json::from_str(&contents)?;
    tracing::info!(
        learner_id = %snapshot.learner_id,
        chunks = snapshot.chunks.len(),
        "progress snapshot imported"
    );
    Ok(snapshot)
}

/// Writes every chunk of the snapshot back into the store, overwriting what is
/// there. Each record is stamped with the stored version first so the write
/// passes the version check. Chunks that fail are logged and skipped; returns
/// how many were restored.
pub fn restore_snapshot<S: ChunkStore>(store: &S, snapshot: &ProgressSnapshot) -> usize {
    let mut restored = 0;
    for chunk in &snapshot.chunks {
        match restore_chunk(store, chunk) {
            Ok(()) => restored += 1,
            Err(err) => tracing::warn!(
                error = %err,
                learner_id = %chunk.learner_id,
                chunk_id = %chunk.chunk_id,
                "failed to restore chunk"
            ),
        }
    }

    tracing::info!(
        learner_id = %snapshot.learner_id,
        restored,
        skipped = snapshot.chunks.len() - restored,
        "progress snapshot restored"
    );
    restored
}

fn restore_chunk<S: ChunkStore>(store: &S, chunk: &ChunkRecord) -> Result<(), StoreError> {
    let stored = store.get_chunk(&chunk.learner_id, &chunk.chunk_id)?;
    let record = ChunkRecord {
        version: stored.map_or(0, |stored| stored.version),
        ..chunk.clone()
    };
    store.put_chunk(&chunk.learner_id, &chunk.chunk_id, &record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryChunkStore;
    use crate::models::ChunkStatus;
    use chrono::TimeZone;
    use std::fs;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 20, 10, 0, 0).unwrap()
    }

    fn store_with_history() -> MemoryChunkStore {
        let store = MemoryChunkStore::new();
        let mut hola = ChunkRecord::new("kid-1", "hola", "greetings");
        hola.status = ChunkStatus::Acquired;
        hola.last_reviewed = Some(now());
        store.put_chunk("kid-1", "hola", &hola).unwrap();
        store
            .put_chunk("kid-1", "adios", &ChunkRecord::new("kid-1", "adios", "greetings"))
            .unwrap();
        store
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kid-1.json");
        let store = store_with_history();

        let exported = export_snapshot(&store, "kid-1", now(), &path).unwrap();
        assert_eq!(exported.chunks.len(), 2);
        assert!(fs::metadata(&path).is_ok(), "File should exist");

        let imported = import_snapshot(&path).unwrap();
        assert_eq!(imported, exported);
        assert_eq!(imported.chunks[1].status, ChunkStatus::Acquired);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_snapshot("nonexistent_progress_xyz123.json");
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_snapshot(&path), Err(ExportError::Json(_))));
    }

    #[test]
    fn test_import_rejects_unknown_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.json");
        let json_content = r#"{
  "learner_id": "kid-1",
  "exported_at": "2026-07-20T10:00:00Z",
  "chunks": [
    {
      "learner_id": "kid-1",
      "chunk_id": "hola",
      "topic_id": "greetings",
      "status": "mastered",
      "ease_factor": 2.5,
      "interval_days": 1,
      "repetitions": 0,
      "last_reviewed": null
    }
  ]
}"#;
        fs::write(&path, json_content).unwrap();
        assert!(import_snapshot(&path).is_err());
    }

    #[test]
    fn test_restore_into_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kid-1.json");
        export_snapshot(&store_with_history(), "kid-1", now(), &path).unwrap();

        let fresh = MemoryChunkStore::new();
        let snapshot = import_snapshot(&path).unwrap();
        assert_eq!(restore_snapshot(&fresh, &snapshot), 2);

        let hola = fresh.get_chunk("kid-1", "hola").unwrap().unwrap();
        assert_eq!(hola.status, ChunkStatus::Acquired);
        assert_eq!(hola.last_reviewed, Some(now()));
        assert_eq!(hola.version, 1);
    }

    #[test]
    fn test_restore_overwrites_newer_progress() {
        let store = store_with_history();
        let snapshot = ProgressSnapshot {
            learner_id: "kid-1".to_string(),
            exported_at: now(),
            chunks: store.list_chunks("kid-1").unwrap(),
        };

        let mut hola = store.get_chunk("kid-1", "hola").unwrap().unwrap();
        hola.status = ChunkStatus::Fragile;
        store.put_chunk("kid-1", "hola", &hola).unwrap();

        assert_eq!(restore_snapshot(&store, &snapshot), 2);
        let hola = store.get_chunk("kid-1", "hola").unwrap().unwrap();
        assert_eq!(hola.status, ChunkStatus::Acquired);
        assert_eq!(hola.version, 3);
    }
}
