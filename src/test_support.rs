//! Shared test fixtures

use std::path::{Path, PathBuf};

use crate::config::ServeContext;

/// Serve root under the system temp dir, removed on drop
pub struct TestRoot {
    path: PathBuf,
}

impl TestRoot {
    pub fn new(name: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("wwwserve-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, relative: &str, contents: &str) {
        self.write_bytes(relative, contents.as_bytes());
    }

    pub fn write_bytes(&self, relative: &str, contents: &[u8]) {
        let file = self.path.join(relative);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(file, contents).unwrap();
    }

    pub fn context(&self) -> ServeContext {
        ServeContext::new(&self.path)
    }
}

impl Drop for TestRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
