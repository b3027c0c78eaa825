//! Filesystem seam behind artifact existence checks.
//!
//! Resolution only ever asks one question of the filesystem: does
//! `dir/relative` exist? Routing that question through a trait lets the
//! same decision logic run against an in-memory layout in tests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Answers whether a file exists under a test-case directory.
pub trait ArtifactProbe {
    fn exists(&self, dir: &Path, relative: &str) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifactProbe;

impl ArtifactProbe for FsArtifactProbe {
    fn exists(&self, dir: &Path, relative: &str) -> bool {
        dir.join(relative).exists()
    }
}

/// Probe answering from a fixed set of present paths.
#[derive(Debug, Clone, Default)]
pub struct StaticArtifactProbe {
    present: BTreeSet<PathBuf>,
}

impl StaticArtifactProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `dir/relative` as existing.
    pub fn mark_present(&mut self, dir: impl AsRef<Path>, relative: &str) {
        self.present.insert(dir.as_ref().join(relative));
    }
}

impl ArtifactProbe for StaticArtifactProbe {
    fn exists(&self, dir: &Path, relative: &str) -> bool {
        self.present.contains(&dir.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_probe_answers_only_marked_paths() {
        let mut probe = StaticArtifactProbe::new();
        probe.mark_present("/cases", "sample.apk");
        assert!(probe.exists(Path::new("/cases"), "sample.apk"));
        assert!(!probe.exists(Path::new("/cases"), "other.apk"));
        assert!(!probe.exists(Path::new("/elsewhere"), "sample.apk"));
    }

    #[test]
    fn fs_probe_sees_real_files() {
        let dir = std::env::temp_dir().join("compat_harness_probe_test");
        std::fs::create_dir_all(&dir).expect("create fixture dir");
        let file = dir.join("present.apk");
        std::fs::write(&file, b"apk").expect("write fixture");

        let probe = FsArtifactProbe;
        assert!(probe.exists(&dir, "present.apk"));
        assert!(!probe.exists(&dir, "absent.apk"));

        let _ = std::fs::remove_file(file);
    }
}
