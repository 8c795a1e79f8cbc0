//! Motion clips
//!
//! Clips are loaded once from a directory into an owned library keyed by
//! name. At most one clip plays at a time; starting a clip stops the current
//! one first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{DatagenError, Result};

pub const MOTION_EXTENSION: &str = "motion";

/// Playback backend (the simulator's motion engine)
pub trait MotionPlayer {
    fn play(&mut self, clip: &Path);
    fn stop(&mut self, clip: &Path);
}

/// Index of a clip inside its [`MotionLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionClip {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct MotionLibrary {
    clips: Vec<MotionClip>,
    by_name: HashMap<String, ClipId>,
    playing: Option<ClipId>,
}

/// Clip name from a directory entry: everything before the first `.`
fn clip_name(entry: &str) -> &str {
    entry.split('.').next().unwrap_or(entry)
}

impl MotionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every entry of `dir` not starting with `.`.
    ///
    /// Entries are visited in sorted order so duplicate names resolve the
    /// same way on every platform; the first one wins.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let read = std::fs::read_dir(dir).map_err(|source| DatagenError::MotionDirUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut entries = Vec::new();
        for entry in read {
            let entry = entry?;
            entries.push(entry.file_name().to_string_lossy().into_owned());
        }
        entries.sort();

        let mut library = Self::new();
        for entry in entries.iter().filter(|e| !e.starts_with('.')) {
            let name = clip_name(entry);
            let path = dir.join(format!("{name}.{MOTION_EXTENSION}"));
            library.insert(name, path);
        }
        log::info!("Loaded {} motion clips from {}", library.len(), dir.display());
        Ok(library)
    }

    /// Add a clip; returns `None` if the name is already taken
    pub fn insert(&mut self, name: &str, path: PathBuf) -> Option<ClipId> {
        if self.by_name.contains_key(name) {
            log::debug!("Duplicate motion clip {name} ignored");
            return None;
        }
        let id = ClipId(self.clips.len());
        self.clips.push(MotionClip {
            name: name.to_string(),
            path,
        });
        self.by_name.insert(name.to_string(), id);
        Some(id)
    }

    pub fn find(&self, name: &str) -> Option<ClipId> {
        self.by_name.get(name).copied()
    }

    pub fn clip(&self, id: ClipId) -> &MotionClip {
        &self.clips[id.0]
    }

    pub fn playing(&self) -> Option<&MotionClip> {
        self.playing.map(|id| self.clip(id))
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Stop whatever plays and start `name`. An unknown name leaves the
    /// current clip playing.
    pub fn start<P>(&mut self, name: &str, player: &mut P) -> Result<()>
    where
        P: MotionPlayer + ?Sized,
    {
        let id = self
            .find(name)
            .ok_or_else(|| DatagenError::MotionNotFound(name.to_string()))?;
        if let Some(current) = self.playing.take() {
            player.stop(&self.clips[current.0].path);
        }
        player.play(&self.clips[id.0].path);
        self.playing = Some(id);
        Ok(())
    }

    pub fn stop_all<P: MotionPlayer + ?Sized>(&mut self, player: &mut P) {
        if let Some(current) = self.playing.take() {
            player.stop(&self.clips[current.0].path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl MotionPlayer for Log {
        fn play(&mut self, clip: &Path) {
            self.0.push(format!("play {}", clip.display()));
        }

        fn stop(&mut self, clip: &Path) {
            self.0.push(format!("stop {}", clip.display()));
        }
    }

    fn library() -> MotionLibrary {
        let mut lib = MotionLibrary::new();
        lib.insert("wave", PathBuf::from("m/wave.motion"));
        lib.insert("static_image_collection", PathBuf::from("m/static_image_collection.motion"));
        lib
    }

    #[test]
    fn test_load_dir_names_and_paths() {
        let tmp = tempfile::tempdir().unwrap();
        for f in ["Forwards.motion", "Shoot.motion", ".hidden", "full_time.tar.gz", "notes"] {
            std::fs::write(tmp.path().join(f), "").unwrap();
        }
        let lib = MotionLibrary::load_dir(tmp.path()).unwrap();
        assert_eq!(lib.len(), 4);
        assert!(lib.find(".hidden").is_none());
        let id = lib.find("full_time").unwrap();
        assert_eq!(lib.clip(id).path, tmp.path().join("full_time.motion"));
        assert!(lib.find("notes").is_some());
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("Shoot.motion"), "").unwrap();
        std::fs::write(tmp.path().join("Shoot.bak"), "").unwrap();
        let lib = MotionLibrary::load_dir(tmp.path()).unwrap();
        assert_eq!(lib.len(), 1);
    }

    #[test]
    fn test_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let err = MotionLibrary::load_dir(&tmp.path().join("absent")).unwrap_err();
        assert!(matches!(err, DatagenError::MotionDirUnreadable { .. }));
    }

    #[test]
    fn test_start_stops_previous() {
        let mut lib = library();
        let mut log = Log::default();
        lib.start("wave", &mut log).unwrap();
        lib.start("static_image_collection", &mut log).unwrap();
        assert_eq!(
            log.0,
            vec![
                "play m/wave.motion",
                "stop m/wave.motion",
                "play m/static_image_collection.motion",
            ]
        );
        assert_eq!(lib.playing().unwrap().name, "static_image_collection");
    }

    #[test]
    fn test_unknown_clip_keeps_current() {
        let mut lib = library();
        let mut log = Log::default();
        lib.start("wave", &mut log).unwrap();
        let err = lib.start("moonwalk", &mut log).unwrap_err();
        assert!(matches!(err, DatagenError::MotionNotFound(ref n) if n == "moonwalk"));
        assert_eq!(lib.playing().unwrap().name, "wave");
        assert_eq!(log.0.len(), 1);

        lib.stop_all(&mut log);
        assert!(lib.playing().is_none());
        assert_eq!(log.0.last().map(String::as_str), Some("stop m/wave.motion"));
    }
}
