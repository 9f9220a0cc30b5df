//! Host/guest path translation and name normalization.
//!
//! Pure functions only. Host paths are Windows drive paths (`C:\...`); guest
//! paths are the automount form WSL exposes them under (`/mnt/c/...`).

use crate::domain::error::PathError;

/// Normalize a user-supplied environment name or raw path argument.
///
/// Strips surrounding whitespace and one layer of matching double quotes,
/// removes embedded control characters (`\r`, `\n`, `\t`, ...) and trims
/// again. Applied until the value stops changing, so cleaning is idempotent
/// even for nested quotes.
#[must_use]
pub fn clean_name(value: &str) -> String {
    let mut current = clean_once(value);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(value: &str) -> String {
    let mut cleaned = value.trim();
    if cleaned.len() >= 2 && cleaned.starts_with('"') && cleaned.ends_with('"') {
        cleaned = &cleaned[1..cleaned.len() - 1];
    }
    cleaned
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split a cleaned host path into its drive letter and the remainder after
/// the colon (which starts with a separator).
fn split_drive(path: &str) -> Option<(char, &str)> {
    let mut chars = path.chars();
    let letter = chars.next().filter(char::is_ascii_alphabetic)?;
    if chars.next() != Some(':') {
        return None;
    }
    match chars.next() {
        Some('\\' | '/') => Some((letter, &path[2..])),
        _ => None,
    }
}

/// Whether `path` starts with a drive letter, a colon and a separator.
#[must_use]
pub fn is_drive_path(path: &str) -> bool {
    split_drive(&clean_name(path)).is_some()
}

/// Translate `C:\Users\me\Project` into `/mnt/c/Users/me/Project`.
///
/// # Errors
///
/// Returns [`PathError::InvalidPath`] if the path does not start with a
/// drive letter, a colon and a separator.
pub fn host_to_guest_path(host_path: &str) -> Result<String, PathError> {
    let path = clean_name(host_path);
    let (letter, rest) = split_drive(&path).ok_or_else(|| PathError::InvalidPath(path.clone()))?;
    Ok(format!(
        "/mnt/{}{}",
        letter.to_ascii_lowercase(),
        rest.replace('\\', "/")
    ))
}

/// Translate a host path into the device field of an fstab `drvfs` entry.
///
/// Separators become forward slashes and every space becomes the octal
/// escape `\040`, the only form fstab and the `printf`-generated config
/// accept unchanged.
///
/// # Errors
///
/// Returns [`PathError::InvalidPath`] under the same rules as
/// [`host_to_guest_path`].
pub fn host_to_mount_descriptor(host_path: &str) -> Result<String, PathError> {
    let path = clean_name(host_path);
    if split_drive(&path).is_none() {
        return Err(PathError::InvalidPath(path));
    }
    Ok(path.replace('\\', "/").replace(' ', "\\040"))
}

/// Escape a value for embedding between single quotes in a bash script.
#[must_use]
pub fn escape_for_bash_single_quotes(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Wrap a value in single quotes for a bash script.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", escape_for_bash_single_quotes(value))
}
