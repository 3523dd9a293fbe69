use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::error::StoreError;
use crate::model::npc::NpcRecord;

/// Load every `*.json` file in `dir`, keyed by the record's `name`.
///
/// Files are visited in path order; a later file with the same name
/// replaces the earlier one.
pub fn load_npcs(dir: &Path) -> Result<BTreeMap<String, NpcRecord>, StoreError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| StoreError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut npcs = BTreeMap::new();
    for path in paths {
        let raw = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let npc: NpcRecord =
            serde_json::from_str(&raw).map_err(|e| StoreError::json(&path, e))?;

        if let Some(previous) = npcs.insert(npc.name.clone(), npc) {
            tracing::debug!(name = %previous.name, path = %path.display(), "NPC replaced by later file");
        }
    }

    tracing::info!(count = npcs.len(), dir = %dir.display(), "loaded NPCs");
    Ok(npcs)
}

/// Write `npc` into `dir` under its export file name.
pub fn save_npc(dir: &Path, npc: &NpcRecord) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let path = dir.join(npc.export_file_name());
    if path.parent() != Some(dir) {
        return Err(StoreError::io(
            &path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "NPC file would leave the NPC directory",
            ),
        ));
    }
    let json = npc
        .to_export_json()
        .map_err(|e| StoreError::json(&path, e))?;
    fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;

    tracing::info!(name = %npc.name, path = %path.display(), "saved NPC");
    Ok(path)
}
