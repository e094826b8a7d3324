//! Output pathname derivation.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Extension given to generated documents.
pub const HTML_EXTENSION: &str = "html";

/// Returns a pathname whose file name ends in `.html` and which resides in
/// `output_dir`, given an input `pathname`.
///
/// If `output_dir` is empty the result is a sibling of `pathname`. Otherwise
/// the input's relative structure is kept below `output_dir`. Fails with
/// [`Error::PathCollision`] if the result would be `pathname` itself.
///
/// ```
/// use content2html::html_pathname;
///
/// assert_eq!(html_pathname("notes/intro.content", "site").unwrap().to_str(), Some("site/notes/intro.html"));
/// assert!(html_pathname("index.html", "").is_err());
/// ```
pub fn html_pathname(pathname: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let pathname = pathname.as_ref();
    let output_dir = output_dir.as_ref();

    let sibling = pathname.with_extension(HTML_EXTENSION);
    let html_pathname = if output_dir.as_os_str().is_empty() {
        sibling
    } else {
        clean(&output_dir.join(relative(&sibling)))
    };

    if clean(&html_pathname) == clean(pathname) {
        return Err(Error::PathCollision(pathname.to_path_buf()));
    }
    Ok(html_pathname)
}

/// Drop root and prefix components so `path` can be joined below a directory.
fn relative(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

/// Lexically normalize `path`: drop `.` components and resolve `..` against
/// preceding normal components. Does not touch the filesystem.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
