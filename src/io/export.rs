//! Write rendered views and JSON documents to disk.
//!
//! One SVG per view, named after the view key (`side.svg`, `top.svg`,
//! `cross_section.svg`), so the files line up with the response fields.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{ViewKind, Views};
use crate::error::{AppError, EXIT_IO};

/// Output file name for a view.
pub fn view_file_name(kind: ViewKind) -> String {
    format!("{}.svg", kind.key())
}

/// Write all three views into `dir` (created if missing). Returns the paths written.
pub fn write_views(dir: &Path, views: &Views) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir).map_err(|e| {
        AppError::new(
            EXIT_IO,
            format!("Failed to create output directory '{}': {e}", dir.display()),
        )
    })?;

    let mut written = Vec::with_capacity(ViewKind::ALL.len());
    for kind in ViewKind::ALL {
        let path = dir.join(view_file_name(kind));
        fs::write(&path, views.get(kind)).map_err(|e| {
            AppError::new(EXIT_IO, format!("Failed to write '{}': {e}", path.display()))
        })?;
        written.push(path);
    }
    Ok(written)
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(EXIT_IO, format!("Failed to create '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("neckgen-{name}-{}", std::process::id()))
    }

    #[test]
    fn views_land_under_their_keys() {
        let dir = scratch("views");
        let views = Views {
            side: "<svg>side</svg>".into(),
            top: "<svg>top</svg>".into(),
            cross_section: "<svg>cs</svg>".into(),
        };

        let written = write_views(&dir, &views).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written[2].ends_with("cross_section.svg"));
        assert_eq!(fs::read_to_string(dir.join("top.svg")).unwrap(), "<svg>top</svg>");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn json_is_pretty_printed() {
        let dir = scratch("json");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.json");
        write_json(&path, &serde_json::json!({"success": true})).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"success\": true"));
        fs::remove_dir_all(&dir).ok();
    }
}
