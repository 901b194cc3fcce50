use std::fs;
use std::io::{self, Write};
use std::path::Path;

use curator_core::SessionContext;
use curator_logging::{curator_info, curator_warn};
use tempfile::NamedTempFile;

pub const SESSION_FILENAME: &str = ".curator_session.ron";

/// Missing or unreadable session files yield a signed-out session.
pub(crate) fn load_session(path: &Path) -> SessionContext {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return SessionContext::new();
        }
        Err(err) => {
            curator_warn!("Failed to read session from {:?}: {}", path, err);
            return SessionContext::new();
        }
    };

    match ron::from_str(&content) {
        Ok(session) => session,
        Err(err) => {
            curator_warn!("Failed to parse session from {:?}: {}", path, err);
            SessionContext::new()
        }
    }
}

pub(crate) fn save_session(path: &Path, session: &SessionContext) -> anyhow::Result<()> {
    let content = ron::ser::to_string_pretty(session, ron::ser::PrettyConfig::new())?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;

    curator_info!("Saved session to {:?}", path);
    Ok(())
}

/// Returns whether a session file was removed.
pub(crate) fn clear_session(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
