//! File discovery for source folders.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;
use ufpanel_model::IndicatorSource;
use walkdir::WalkDir;

use crate::error::{IngestError, Result};

/// Column name used when a file stem has no usable characters.
const FALLBACK_FIELD: &str = "indicador";

/// Lists all CSV files under a directory, recursively.
///
/// Returns paths sorted so repeated runs see files in the same order. Only a
/// missing `dir` is an error. A `.csv` entry the walk cannot stat (a dangling
/// link, say) is still listed so reading it fails for that file alone; other
/// unreadable entries are skipped with a warning.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    for entry_result in WalkDir::new(dir).follow_links(true) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(error) => {
                match error.path() {
                    Some(path) if has_csv_extension(path) => files.push(path.to_path_buf()),
                    path => warn!(
                        path = %path.unwrap_or(dir).display(),
                        %error,
                        "skipping unreadable directory entry"
                    ),
                }
                continue;
            }
        };

        // Skip directories
        if !entry.file_type().is_file() {
            continue;
        }

        if has_csv_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    files.dedup();

    Ok(files)
}

/// Case-insensitive `.csv` check.
fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Lists extra indicator files and the column each one feeds.
///
/// Column names are slugs of the file stems, made unique with `-2`, `-3`...
/// suffixes in discovery order.
pub fn discover_indicator_sources(dir: &Path) -> Result<Vec<IndicatorSource>> {
    let files = list_csv_files(dir)?;
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut sources = Vec::with_capacity(files.len());

    for path in files {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let mut base = slugify(stem);
        if base.is_empty() {
            base = FALLBACK_FIELD.to_string();
        }
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        let field = if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        };
        sources.push(IndicatorSource::new(path, field));
    }

    Ok(sources)
}

/// ASCII, lowercase, hyphen-separated form of `text`.
///
/// Latin-1 letters lose their accents; every other run of non-alphanumeric
/// characters becomes one `-`.
pub fn slugify(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.chars() {
        fold_char(ch, &mut folded);
    }

    let mut slug = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for ch in folded.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn fold_char(ch: char, out: &mut String) {
    let folded = match ch {
        'À'..='Å' | 'à'..='å' => "a",
        'Æ' | 'æ' => "ae",
        'Ç' | 'ç' => "c",
        'È'..='Ë' | 'è'..='ë' => "e",
        'Ì'..='Ï' | 'ì'..='ï' => "i",
        'Ð' | 'ð' => "d",
        'Ñ' | 'ñ' => "n",
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' => "o",
        'Ù'..='Ü' | 'ù'..='ü' => "u",
        'Ý' | 'ý' | 'ÿ' => "y",
        'Þ' | 'þ' => "th",
        'ß' => "ss",
        c if c.is_ascii() => {
            out.push(c);
            return;
        }
        _ => " ",
    };
    out.push_str(folded);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("2019-2021")).unwrap();

        for name in &[
            "Violência física.csv",
            "2019-2021/violencia_fisica.csv",
            "2019-2021/Estupro.CSV",
            "README.txt",
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, "header\ndata").unwrap();
        }

        dir
    }

    #[test]
    fn test_list_csv_files_recurses() {
        let dir = create_test_dir();
        let files = list_csv_files(dir.path()).unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|p| p.extension().is_some()));
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_list_csv_files_empty_dir() {
        let dir = TempDir::new().unwrap();
        let files = list_csv_files(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_csv_files_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = list_csv_files(&dir.path().join("domestica"));
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_csv_files_keeps_dangling_link() {
        let dir = create_test_dir();
        std::os::unix::fs::symlink(dir.path().join("missing.csv"), dir.path().join("broken.csv"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("gone-dir")).unwrap();

        let files = list_csv_files(dir.path()).unwrap();

        assert_eq!(files.len(), 4);
        assert!(files.contains(&dir.path().join("broken.csv")));
        assert!(!files.iter().any(|p| p.ends_with("gone-dir")));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Violência física"), "violencia-fisica");
        assert_eq!(slugify("violencia_fisica"), "violencia-fisica");
        assert_eq!(slugify("  Lesão Corporal (2019) "), "lesao-corporal-2019");
        assert_eq!(slugify("Estupro"), "estupro");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_discover_indicator_sources_dedupes_fields() {
        let dir = create_test_dir();
        let sources = discover_indicator_sources(dir.path()).unwrap();

        let fields: Vec<&str> = sources.iter().map(|s| s.field.as_str()).collect();
        assert_eq!(fields.len(), 3);
        assert!(fields.contains(&"estupro"));
        assert!(fields.contains(&"violencia-fisica"));
        assert!(fields.contains(&"violencia-fisica-2"));
    }
}
