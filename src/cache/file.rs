use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::cache::CacheStore;
use crate::error::{Error, Result};
use crate::models::SemesterId;

const DELIMITER: &str = "::";
const EXTENSION: &str = "cache";

/// One `<SemesterId>.cache` file per semester under a configured directory,
/// one `description::grade` record per line. SemesterId is alphanumeric plus
/// dashes, so the file name needs no escaping. Course descriptions must not
/// contain the `::` delimiter themselves.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: &Path) -> Result<Self> {
        fs::create_dir_all(path)?;
        Ok(Self { path: path.to_path_buf() })
    }

    fn file_for(&self, semester: &SemesterId) -> PathBuf {
        self.path.join(format!("{semester}.{EXTENSION}"))
    }
}

#[async_trait]
impl CacheStore for FileCache {
    async fn get(&self, semester: &SemesterId) -> Result<HashMap<String, String>> {
        let filename = self.file_for(semester);
        if !filename.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&filename)?;
        let mut grades = HashMap::new();
        for (number, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            // A line without the delimiter means the file was truncated or
            // hand-edited; treating it as empty would re-notify everything.
            let (description, grade) = line.split_once(DELIMITER).ok_or_else(|| {
                Error::CacheCorruption(format!(
                    "{}: line {} has no {DELIMITER:?} delimiter",
                    filename.display(),
                    number + 1
                ))
            })?;
            grades.insert(description.to_string(), grade.to_string());
        }
        Ok(grades)
    }

    async fn set(&mut self, semester: &SemesterId, grades: &HashMap<String, String>) -> Result<()> {
        let mut content = String::new();
        for (description, grade) in grades {
            content.push_str(description);
            content.push_str(DELIMITER);
            content.push_str(grade);
            content.push('\n');
        }

        // Write-then-rename so a crash mid-write cannot truncate the entry.
        let filename = self.file_for(semester);
        let tmp = filename.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &filename)?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
