//! Source file discovery and bulk retrieval.

use tracing::{debug, warn};

use super::error::GitHubError;
use super::gateway::BrowseGateway;
use super::locator::RepositoryLocator;
use super::models::{ContentKind, FileContent, SourceFile};

const SOURCE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "py", "java", "cpp", "c", "cs", "php", "rb", "go", "rs", "swift",
    "kt", "scala", "clj", "hs", "ml", "fs", "vb", "r", "m", "pl", "sh", "bash",
];

/// Returns `true` when the file name carries a recognised source extension.
///
/// Matching is case-insensitive and only the text after the last `.` counts.
#[must_use]
pub fn is_source_file(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, extension)| {
        SOURCE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(extension))
    })
}

/// Walks the repository from `root` and returns every source file.
///
/// Directories are visited depth-first in the order GitHub lists them, so a
/// directory's files appear where the directory itself was listed.
///
/// # Errors
///
/// Returns the first [`GitHubError`] raised while listing a directory.
pub async fn collect_source_files<G>(
    gateway: &G,
    locator: &RepositoryLocator,
    root: &str,
) -> Result<Vec<SourceFile>, GitHubError>
where
    G: BrowseGateway + ?Sized,
{
    let mut pending = vec![gateway.list_contents(locator, root).await?.into_iter()];
    let mut found = Vec::new();

    while let Some(entries) = pending.last_mut() {
        let Some(entry) = entries.next() else {
            pending.pop();
            continue;
        };
        match entry.kind {
            ContentKind::File if is_source_file(&entry.name) => {
                found.push(SourceFile::from(entry));
            }
            ContentKind::Dir => {
                debug!(path = %entry.path, "descending into directory");
                let children = gateway.list_contents(locator, &entry.path).await?;
                pending.push(children.into_iter());
            }
            ContentKind::File | ContentKind::Other => {}
        }
    }

    Ok(found)
}

/// A file that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFetchError {
    /// Path that was requested.
    pub path: String,
    /// Why the fetch failed.
    pub error: GitHubError,
}

/// Fetches each path in turn, keeping per-file failures instead of aborting.
///
/// The result has one entry per requested path, in request order.
pub async fn fetch_files<G>(
    gateway: &G,
    locator: &RepositoryLocator,
    paths: &[String],
) -> Vec<Result<FileContent, FileFetchError>>
where
    G: BrowseGateway + ?Sized,
{
    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let fetched = gateway
            .file_content(locator, path)
            .await
            .map_err(|error| {
                warn!(path = %path, error = %error, "failed to fetch file");
                FileFetchError {
                    path: path.clone(),
                    error,
                }
            });
        results.push(fetched);
    }
    results
}
