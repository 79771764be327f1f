use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Read a user-data payload (cloud-init or similar) from disk.
pub fn read_user_data(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("read user data from {}", path.display()))
}

/// Hex SHA-256 of the payload, shown in the summary so the operator can
/// check what is about to be sent.
pub fn user_data_digest(user_data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_data.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_digest_of_known_payload() {
        assert_eq!(
            user_data_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_read_user_data_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"#cloud-config\npackages: [nginx]\n").unwrap();

        let data = read_user_data(file.path()).unwrap();

        assert!(data.starts_with("#cloud-config"));
    }

    #[test]
    fn test_missing_user_data_file() {
        assert!(read_user_data("/definitely/not/here.yaml").is_err());
    }
}
