//! Seed snapshot loading
//!
//! The seed is three read-only JSON arrays read once at startup. Files produced by the original
//! data generator (`usuarios.json`, `musicas.json`, `playlists.json` with Portuguese camelCase
//! keys) load unchanged through serde aliases; the canonical names are tried first.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedUser {
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "idade")]
    pub age: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSong {
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "artista")]
    pub artist: String,
    #[serde(alias = "duracaoSegundos", alias = "durationSeconds")]
    pub duration_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPlaylist {
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "idUsuario", alias = "ownerId")]
    pub owner_id: String,
    #[serde(default, alias = "musicas", alias = "songIds")]
    pub song_ids: Vec<String>,
}

/// Initial state injected into the Store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    pub users: Vec<SeedUser>,
    pub songs: Vec<SeedSong>,
    pub playlists: Vec<SeedPlaylist>,
}

const USER_FILES: &[&str] = &["users.json", "usuarios.json"];
const SONG_FILES: &[&str] = &["songs.json", "musicas.json"];
const PLAYLIST_FILES: &[&str] = &["playlists.json"];

impl SeedData {
    /// Load the seed snapshot from `dir`
    ///
    /// A missing directory yields an empty snapshot (with a warning); a missing collection file
    /// inside an existing directory yields an empty collection. Malformed JSON is an error.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            warn!(
                "Seed directory {} not found, starting with an empty catalog",
                dir.display()
            );
            return Ok(Self::default());
        }

        let seed = Self {
            users: load_collection(dir, USER_FILES)?,
            songs: load_collection(dir, SONG_FILES)?,
            playlists: load_collection(dir, PLAYLIST_FILES)?,
        };

        info!(
            "Read seed from {}: {} users, {} songs, {} playlists",
            dir.display(),
            seed.users.len(),
            seed.songs.len(),
            seed.playlists.len()
        );
        Ok(seed)
    }
}

fn find_file(dir: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

fn load_collection<T: DeserializeOwned>(dir: &Path, candidates: &[&str]) -> Result<Vec<T>> {
    let Some(path) = find_file(dir, candidates) else {
        warn!(
            "No {} in {}, collection starts empty",
            candidates.join(" or "),
            dir.display()
        );
        return Ok(Vec::new());
    };

    let content = std::fs::read_to_string(&path)?;
    serde_json::from_str(&content).map_err(|source| Error::SeedFormat {
        file: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_original_generator_format() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("usuarios.json"),
            r#"[{"id": "u1", "nome": "Ana Silva", "idade": 28}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("musicas.json"),
            r#"[{"id": "s1", "nome": "Saudade 3", "artista": "Trio", "duracaoSegundos": 215}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("playlists.json"),
            r#"[{"id": "p1", "nome": "Favoritas", "idUsuario": "u1", "musicas": ["s1"]}]"#,
        )
        .unwrap();

        let seed = SeedData::load_dir(dir.path()).unwrap();
        assert_eq!(seed.users[0].name, "Ana Silva");
        assert_eq!(seed.songs[0].duration_seconds, 215);
        assert_eq!(seed.playlists[0].owner_id, "u1");
        assert_eq!(seed.playlists[0].song_ids, vec!["s1".to_string()]);
    }

    #[test]
    fn test_canonical_names_take_precedence() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("users.json"),
            r#"[{"id": "u1", "name": "Canonical", "age": 40}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("usuarios.json"),
            r#"[{"id": "u9", "nome": "Legacy", "idade": 20}]"#,
        )
        .unwrap();

        let seed = SeedData::load_dir(dir.path()).unwrap();
        assert_eq!(seed.users.len(), 1);
        assert_eq!(seed.users[0].name, "Canonical");
        assert!(seed.songs.is_empty());
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let seed = SeedData::load_dir(&dir.path().join("absent")).unwrap();
        assert_eq!(seed, SeedData::default());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("songs.json"), "[{").unwrap();

        let err = SeedData::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, Error::SeedFormat { .. }));
    }
}
