//! In-memory virtual filesystem
//!
//! The file registry a runtime reads its inputs from. Not backed by disk:
//! everything lives for the lifetime of the runtime that owns it.

use bitflags::bitflags;
use hashbrown::{HashMap, HashSet};
use thiserror::Error;

use gbhost_shared::ROOT_DIR;

bitflags! {
    /// Permission bits of a file, in the usual rwx octal layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileMode: u16 {
        /// Readable by owner, group and others (0o444)
        const READ = 0o444;
        /// Writable by owner, group and others (0o222)
        const WRITE = 0o222;
    }
}

impl FileMode {
    /// Build a mode from read/write flags.
    pub fn from_permissions(can_read: bool, can_write: bool) -> Self {
        let mut mode = FileMode::empty();
        mode.set(FileMode::READ, can_read);
        mode.set(FileMode::WRITE, can_write);
        mode
    }
}

/// Error type for virtual filesystem operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// No file or directory at the path
    #[error("{0}: No such file or directory")]
    NotFound(String),
    /// Something already exists at the path
    #[error("{0}: File exists")]
    AlreadyExists(String),
    /// Parent path is not a directory
    #[error("{0}: Not a directory")]
    NotADirectory(String),
    /// Mode bits forbid the operation
    #[error("{0}: Permission denied")]
    PermissionDenied(String),
    /// Name is empty or contains a separator
    #[error("{0:?}: Invalid file name")]
    InvalidName(String),
}

impl FsError {
    /// The `strerror`-style reason, without the path.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "No such file or directory",
            Self::AlreadyExists(_) => "File exists",
            Self::NotADirectory(_) => "Not a directory",
            Self::PermissionDenied(_) => "Permission denied",
            Self::InvalidName(_) => "Invalid file name",
        }
    }
}

#[derive(Debug, Clone)]
struct VfsFile {
    data: Vec<u8>,
    mode: FileMode,
}

/// In-memory filesystem with a root directory.
#[derive(Debug, Clone)]
pub struct Vfs {
    dirs: HashSet<String>,
    files: HashMap<String, VfsFile>,
}

impl Vfs {
    /// Create a filesystem containing only the root directory.
    pub fn new() -> Self {
        let mut dirs = HashSet::new();
        dirs.insert(ROOT_DIR.to_string());
        Self {
            dirs,
            files: HashMap::new(),
        }
    }

    /// Resolve a path to its absolute form. Relative paths resolve against `/`.
    pub fn resolve(path: &str) -> String {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return ROOT_DIR.to_string();
        }
        if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// Create a directory. Its parent must already exist.
    pub fn create_dir(&mut self, path: &str) -> Result<(), FsError> {
        let path = Self::resolve(path);
        let (parent, name) = split_parent(&path);
        if name.is_empty() {
            return Err(FsError::AlreadyExists(path));
        }
        self.check_dir(parent)?;
        if self.exists(&path) {
            return Err(FsError::AlreadyExists(path));
        }
        self.dirs.insert(path);
        Ok(())
    }

    /// Create a file holding `data` under `parent`.
    ///
    /// Fails if the parent is not a directory or the name is already taken.
    /// Returns the absolute path of the new file.
    pub fn create_data_file(
        &mut self,
        parent: &str,
        name: &str,
        data: &[u8],
        can_read: bool,
        can_write: bool,
    ) -> Result<String, FsError> {
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(FsError::InvalidName(name.to_string()));
        }

        let parent = Self::resolve(parent);
        self.check_dir(&parent)?;

        let path = join(&parent, name);
        if self.exists(&path) {
            return Err(FsError::AlreadyExists(path));
        }

        self.files.insert(
            path.clone(),
            VfsFile {
                data: data.to_vec(),
                mode: FileMode::from_permissions(can_read, can_write),
            },
        );
        Ok(path)
    }

    /// Read a whole file. Requires the read bit.
    pub fn read(&self, path: &str) -> Result<&[u8], FsError> {
        let path = Self::resolve(path);
        let file = self.file(&path)?;
        if !file.mode.contains(FileMode::READ) {
            return Err(FsError::PermissionDenied(path));
        }
        Ok(&file.data)
    }

    /// Replace a file's contents. Requires the write bit.
    pub fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        let path = Self::resolve(path);
        let file = match self.files.get_mut(&path) {
            Some(file) => file,
            None if self.dirs.contains(&path) => return Err(FsError::PermissionDenied(path)),
            None => return Err(FsError::NotFound(path)),
        };
        if !file.mode.contains(FileMode::WRITE) {
            return Err(FsError::PermissionDenied(path));
        }
        file.data = data.to_vec();
        Ok(())
    }

    /// Mode bits of a file.
    pub fn mode(&self, path: &str) -> Option<FileMode> {
        self.files.get(&Self::resolve(path)).map(|f| f.mode)
    }

    /// True if a file or directory exists at the path.
    pub fn exists(&self, path: &str) -> bool {
        let path = Self::resolve(path);
        self.files.contains_key(&path) || self.dirs.contains(&path)
    }

    /// Names of the entries directly inside a directory, sorted.
    pub fn list(&self, dir: &str) -> Result<Vec<String>, FsError> {
        let dir = Self::resolve(dir);
        self.check_dir(&dir)?;

        let mut names: Vec<String> = self
            .files
            .keys()
            .chain(self.dirs.iter())
            .filter(|path| path.as_str() != dir)
            .filter_map(|path| {
                let (parent, name) = split_parent(path);
                (parent == dir).then(|| name.to_string())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    /// Number of files (directories excluded).
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn file(&self, path: &str) -> Result<&VfsFile, FsError> {
        self.files
            .get(path)
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    fn check_dir(&self, path: &str) -> Result<(), FsError> {
        if self.dirs.contains(path) {
            Ok(())
        } else if self.files.contains_key(path) {
            Err(FsError::NotADirectory(path.to_string()))
        } else {
            Err(FsError::NotFound(path.to_string()))
        }
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent == ROOT_DIR {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

// "/a/b" -> ("/a", "b"), "/a" -> ("/", "a"), "/" -> ("/", "")
fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some(("", name)) => (ROOT_DIR, name),
        Some((parent, name)) => (parent, name),
        None => (ROOT_DIR, path),
    }
}
