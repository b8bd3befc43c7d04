//! Loads the JSON document describing a target machine's desired storage
//! topology into the types `blockplan` drives against. Parsing the document
//! itself is this binary's job; the declarative `storage` list it produces
//! is handed unmodified to `blockplan::EntityStore`.

use crate::errors::ConfigError;
use blockplan::{Entity, Environment};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

#[derive(Debug, Deserialize)]
struct Document {
    target: PathBuf,
    fstab: Option<PathBuf>,
    storage: Vec<Entity>,
}

/// Reads and parses the config at `path`, returning the declarative storage
/// list alongside the environment the executor will run it against.
pub fn load(path: &Path) -> Result<(Vec<Entity>, Environment), ConfigError> {
    let data = fs::read_to_string(path)
        .map_err(|why| ConfigError::Read { path: path.to_owned(), why })?;

    let document: Document = serde_json::from_str(&data)
        .map_err(|why| ConfigError::Parse { path: path.to_owned(), why })?;

    let environment = Environment::new(document.target, document.fstab);
    Ok((document.storage, environment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("blockplan-cli-test-{}.json", name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_target_and_storage_list() {
        let path = write_temp(
            "loads-target",
            r#"{
                "target": "/target",
                "fstab": "/target/etc/fstab",
                "storage": [
                    {"id": "sda", "type": "disk", "path": "/dev/sda", "ptable": "gpt"}
                ]
            }"#,
        );

        let (storage, environment) = load(&path).unwrap();
        assert_eq!(storage.len(), 1);
        assert_eq!(storage[0].id(), "sda");
        assert_eq!(environment.target, PathBuf::from("/target"));
        assert_eq!(environment.fstab, Some(PathBuf::from("/target/etc/fstab")));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_fstab_is_optional() {
        let path = write_temp("missing-fstab", r#"{"target": "/target", "storage": []}"#);

        let (storage, environment) = load(&path).unwrap();
        assert!(storage.is_empty());
        assert_eq!(environment.fstab, None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn rejects_malformed_json() {
        let path = write_temp("malformed", "not json");
        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn rejects_missing_file() {
        let path = PathBuf::from("/nonexistent/blockplan-cli-test.json");
        assert!(matches!(load(&path), Err(ConfigError::Read { .. })));
    }
}
