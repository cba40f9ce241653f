use std::io;
use std::path::{Path, PathBuf};

use super::reader::LocalStore;

/// Picks the local store file that belongs to the current player.
///
/// The game keeps several `*.db` files in its `LocalStorage` directory (save
/// profiles and rotated backups). The file whose level-data entry for
/// `player_id` records the highest union level is the live one. Candidates
/// that fail to open or hold no entry for the player are skipped. When no
/// candidate matches at all, the first directory entry in name order is
/// returned as a last resort; `None` means the directory is empty.
///
/// This runs once per update tick, not once per session, because the active
/// file can change while the game runs.
pub fn select_active_file(directory: &Path, player_id: &str) -> io::Result<Option<PathBuf>> {
    let mut entries: Vec<PathBuf> = directory
        .read_dir()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let mut best: Option<(u32, PathBuf)> = None;

    for path in entries.iter().filter(|path| is_store_file(path)) {
        let store = match LocalStore::open(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::debug!("Skipping candidate {}: {e}", path.display());
                continue;
            }
        };

        let level = match store.level_data(player_id) {
            Ok(data) => data.level.unwrap_or(0),
            Err(e) => {
                tracing::debug!("Skipping candidate {}: {e}", path.display());
                continue;
            }
        };

        if best.as_ref().map_or(true, |(max, _)| level > *max) {
            best = Some((level, path.clone()));
        }
    }

    Ok(best.map(|(_, path)| path).or_else(|| entries.into_iter().next()))
}

fn is_store_file(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "db")
}
