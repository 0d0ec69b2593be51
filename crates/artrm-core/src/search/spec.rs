//! File specification and item record types.

use serde::{Deserialize, Serialize};

/// How [`FileSpec::pattern`] text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryMode {
    /// `<repo>/<path>/<name>` with `*` / `?` wildcards.
    StructuredPattern,
    /// AQL sent to the server unmodified.
    LiteralQuery,
}

/// What to search for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    pattern: String,
    mode: QueryMode,
    recursive: bool,
    include_directories: bool,
}

impl FileSpec {
    /// Structured pattern, recursive, files only.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            mode: QueryMode::StructuredPattern,
            recursive: true,
            include_directories: false,
        }
    }

    /// Literal AQL query.
    pub fn aql(query: impl Into<String>) -> Self {
        Self {
            pattern: query.into(),
            mode: QueryMode::LiteralQuery,
            recursive: true,
            include_directories: false,
        }
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_include_directories(mut self, include_directories: bool) -> Self {
        self.include_directories = include_directories;
        self
    }

    /// Pattern or query text.
    pub fn text(&self) -> &str {
        &self.pattern
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn includes_directories(&self) -> bool {
        self.include_directories
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    File,
}

impl ItemKind {
    /// AQL `type` value; anything but `folder` is treated as a file.
    pub fn from_aql(value: Option<&str>) -> Self {
        match value {
            Some(kind) if kind.eq_ignore_ascii_case("folder") => Self::Folder,
            _ => Self::File,
        }
    }
}

/// A remote entry found by search. Identity is `(repo, path)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    repo: String,
    path: String,
    kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sha1: Option<String>,
}

impl ItemRecord {
    /// `path` is repo-relative; separators are normalized to `/` and
    /// leading/trailing separators are dropped.
    pub fn new(repo: impl Into<String>, path: impl AsRef<str>, kind: ItemKind) -> Self {
        Self {
            repo: repo.into(),
            path: normalize_path(path.as_ref()),
            kind,
            size: None,
            sha1: None,
        }
    }

    pub fn file(repo: impl Into<String>, path: impl AsRef<str>) -> Self {
        Self::new(repo, path, ItemKind::File)
    }

    pub fn folder(repo: impl Into<String>, path: impl AsRef<str>) -> Self {
        Self::new(repo, path, ItemKind::Folder)
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_sha1(mut self, sha1: impl Into<String>) -> Self {
        self.sha1 = Some(sha1.into());
        self
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn sha1(&self) -> Option<&str> {
        self.sha1.as_deref()
    }

    /// `<repo>/<path>`, the form used for URLs and hierarchy comparisons.
    pub fn full_path(&self) -> String {
        if self.path.is_empty() {
            self.repo.clone()
        } else {
            format!("{}/{}", self.repo, self.path)
        }
    }
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
