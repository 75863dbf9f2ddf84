//! Personal access token loading.

use std::path::Path;

use crate::prelude::*;

const TOKEN_ENV: &str = "GH_ACCESS_TOKEN";
const TOKEN_FILE: &str = "accesstoken";

/// Load the API token from the environment or the `accesstoken` file.
pub fn load_token() -> Result<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        return Ok(token.trim().to_string());
    }
    let path = Path::new(TOKEN_FILE);
    if !path.exists() {
        return Err(Error::TokenMissing);
    }
    read_token_file(path)
}

/// Read a token file, enforcing owner-only permissions.
pub fn read_token_file(path: &Path) -> Result<String> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(path)?.permissions().mode() & 0o777;
        if mode != 0o600 {
            return Err(Error::TokenFilePermissions {
                path: path.display().to_string(),
                mode,
            });
        }
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(contents.trim().to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn write_token(dir: &Path, mode: u32) -> std::path::PathBuf {
        let path = dir.join("accesstoken");
        fs::write(&path, "ghp_secret\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn owner_only_file_is_accepted_and_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_token(dir.path(), 0o600);
        assert_eq!(read_token_file(&path).unwrap(), "ghp_secret");
    }

    #[test]
    fn group_readable_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_token(dir.path(), 0o640);
        assert!(matches!(
            read_token_file(&path),
            Err(Error::TokenFilePermissions { mode: 0o640, .. })
        ));
    }
}
