//! Unit identity and the file-naming contract shared with the export step.
//!
//! The export step enumerates every rewritten file by its identity and writes
//! the embedded page to `<sha1-hex(identity)>.html`. Both sides must agree on
//! the hash input and encoding, so the naming lives here as public functions.

use std::path::{Component, Path, PathBuf};

use sha1::{Digest, Sha1};
use url::Url;

use crate::error::{DomDirectiveError, Result};

pub const IOS_BUNDLE_DIR: &str = "www.bundle";
pub const ANDROID_ASSET_ROOT: &str = "file:///android_asset";
pub const ANDROID_ASSET_DIR: &str = "www";

/// `file://` URL of `path`, resolved against `cwd` when relative.
///
/// On POSIX a backslash is an ordinary filename byte and is written as `%5C`,
/// matching the bundler's own path-to-URL conversion that the export step hashes.
pub fn file_url(path: &Path, cwd: Option<&Path>) -> Result<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = cwd.ok_or_else(|| {
            DomDirectiveError::Configuration(format!(
                "cannot resolve relative filename {} without a working directory",
                path.display()
            ))
        })?;
        cwd.join(path)
    };
    let normalized = normalize(&absolute);
    Url::from_file_path(&normalized)
        .map(|url| escape_backslashes(url.into()))
        .map_err(|()| {
            DomDirectiveError::Configuration(format!(
                "cannot convert {} to a file URL",
                normalized.display()
            ))
        })
}

#[cfg(not(windows))]
fn escape_backslashes(url: String) -> String {
    url.replace('\\', "%5C")
}

#[cfg(windows)]
fn escape_backslashes(url: String) -> String {
    url
}

// Lexical only; symlinks are left alone.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Lowercase hex SHA-1 of the identity.
pub fn output_hash(identity: &str) -> String {
    hex::encode(Sha1::digest(identity.as_bytes()))
}

pub fn asset_file_name(identity: &str) -> String {
    format!("{}.html", output_hash(identity))
}

/// Bundle-relative location of the page on iOS.
pub fn ios_bundle_uri(identity: &str) -> String {
    format!("{IOS_BUNDLE_DIR}/{}", asset_file_name(identity))
}

/// Path appended to [`ANDROID_ASSET_ROOT`] at run time.
pub fn android_asset_path(identity: &str) -> String {
    format!("{ANDROID_ASSET_DIR}/{}", asset_file_name(identity))
}

/// The full URI the Android proxy evaluates to.
pub fn android_asset_uri(identity: &str) -> String {
    format!("{ANDROID_ASSET_ROOT}{}", android_asset_path(identity))
}
