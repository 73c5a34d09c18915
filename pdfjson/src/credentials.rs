//! Loading API keys from the key file and the command line.

use anyhow::Context;
use pdfjson_extraction::{CredentialError, Credentials};
use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// Environment variable that overrides the default key file location.
pub const KEY_FILE_ENV_VAR: &str = "PDFJSON_API_KEY_FILE";

/// Key file looked up next to the executable.
pub const KEY_FILE_NAME: &str = "api_key.txt";

/// Parses a key file: one key per line, `#` comments and blank lines skipped.
#[must_use]
pub fn parse_key_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// Parses a comma-separated `--api` value.
#[must_use]
pub fn parse_key_list(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Locates the key file.
///
/// Resolution order:
/// 1. `explicit` if provided (it must exist).
/// 2. The path in the `PDFJSON_API_KEY_FILE` environment variable, if it exists.
/// 3. `api_key.txt` in the directory of the running executable, if it exists.
///
/// Returns `Ok(None)` when no key file is found.
///
/// # Errors
///
/// Returns `AppError::Config` when an explicit path does not exist.
pub fn resolve_key_file(explicit: Option<&Path>) -> Result<Option<PathBuf>, AppError> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    resolve_key_file_from(explicit, std::env::var(KEY_FILE_ENV_VAR).ok(), exe_dir)
}

fn resolve_key_file_from(
    explicit: Option<&Path>,
    env_value: Option<String>,
    exe_dir: Option<PathBuf>,
) -> Result<Option<PathBuf>, AppError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(Some(path.to_path_buf()));
        }
        return Err(AppError::Config(format!(
            "API key file does not exist: {}",
            path.display()
        )));
    }

    if let Some(path) = env_value.map(PathBuf::from) {
        if path.is_file() {
            return Ok(Some(path));
        }
        tracing::warn!(
            path = %path.display(),
            "{KEY_FILE_ENV_VAR} points to a missing file; ignoring it"
        );
    }

    Ok(exe_dir
        .map(|dir| dir.join(KEY_FILE_NAME))
        .filter(|path| path.is_file()))
}

/// Builds the credential list.
///
/// A non-empty key file takes precedence over `--api`; the command-line
/// list is used only when there is no key file or it holds no keys.
///
/// # Errors
///
/// Returns `AppError::Credentials` when neither source yields a key, or an
/// I/O error when the key file cannot be read.
pub fn load_credentials(
    key_file: Option<&Path>,
    api_arg: Option<&str>,
) -> Result<Credentials, AppError> {
    let from_arg = api_arg.map(parse_key_list).unwrap_or_default();

    if let Some(path) = key_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read API key file {}", path.display()))?;
        let from_file = parse_key_file(&content);

        if !from_file.is_empty() {
            if !from_arg.is_empty() {
                tracing::warn!(
                    file = %path.display(),
                    "Key file takes precedence; ignoring {} key(s) from --api",
                    from_arg.len()
                );
            }
            let credentials = Credentials::new(from_file)?;
            tracing::info!(
                "{} API key(s) loaded from '{}'",
                credentials.len(),
                path.display()
            );
            return Ok(credentials);
        }
        tracing::warn!(file = %path.display(), "Key file contains no keys");
    }

    if from_arg.is_empty() {
        return Err(CredentialError::Empty.into());
    }
    let credentials = Credentials::new(from_arg)?;
    tracing::info!("{} API key(s) provided via --api", credentials.len());
    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfjson_extraction::Credential;
    use std::io::Write;

    fn keys(credentials: &Credentials) -> Vec<&str> {
        credentials.iter().map(Credential::expose).collect()
    }

    fn key_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_key_file_skips_comments_and_blanks() {
        let parsed = parse_key_file("# team keys\nAIza-one\n\n   \n  AIza-two  \n#AIza-disabled\n");
        assert_eq!(parsed, vec!["AIza-one", "AIza-two"]);
    }

    #[test]
    fn test_parse_key_list() {
        assert_eq!(parse_key_list(" a, b,,c ,"), vec!["a", "b", "c"]);
        assert!(parse_key_list(" , ").is_empty());
    }

    #[test]
    fn test_file_takes_precedence_over_arg() {
        let file = key_file("file-1\nfile-2\n");
        let credentials = load_credentials(Some(file.path()), Some("arg-1,arg-2")).unwrap();
        assert_eq!(keys(&credentials), vec!["file-1", "file-2"]);
    }

    #[test]
    fn test_arg_used_without_file() {
        let credentials = load_credentials(None, Some("arg-1, arg-2, arg-1")).unwrap();
        assert_eq!(keys(&credentials), vec!["arg-1", "arg-2"]);
    }

    #[test]
    fn test_empty_file_falls_back_to_arg() {
        let file = key_file("# nothing here\n");
        let credentials = load_credentials(Some(file.path()), Some("arg-1")).unwrap();
        assert_eq!(keys(&credentials), vec!["arg-1"]);
    }

    #[test]
    fn test_no_source_is_config_error() {
        assert!(matches!(
            load_credentials(None, None),
            Err(AppError::Credentials(CredentialError::Empty))
        ));
        assert!(matches!(
            load_credentials(None, Some(" , ")),
            Err(AppError::Credentials(CredentialError::Empty))
        ));
    }

    #[test]
    fn test_file_duplicates_removed() {
        let file = key_file("k1\nk2\nk1\n");
        let credentials = load_credentials(Some(file.path()), None).unwrap();
        assert_eq!(keys(&credentials), vec!["k1", "k2"]);
    }

    #[test]
    fn test_resolve_explicit_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("keys.txt");
        assert!(matches!(
            resolve_key_file_from(Some(&missing), None, None),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_prefers_explicit_then_env_then_exe_dir() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.txt");
        let from_env = dir.path().join("env.txt");
        std::fs::write(&explicit, "k").unwrap();
        std::fs::write(&from_env, "k").unwrap();
        std::fs::write(dir.path().join(KEY_FILE_NAME), "k").unwrap();
        let env_value = Some(from_env.display().to_string());
        let exe_dir = Some(dir.path().to_path_buf());

        assert_eq!(
            resolve_key_file_from(Some(&explicit), env_value.clone(), exe_dir.clone()).unwrap(),
            Some(explicit.clone())
        );
        assert_eq!(
            resolve_key_file_from(None, env_value, exe_dir.clone()).unwrap(),
            Some(from_env)
        );
        assert_eq!(
            resolve_key_file_from(None, None, exe_dir).unwrap(),
            Some(dir.path().join(KEY_FILE_NAME))
        );
    }

    #[test]
    fn test_resolve_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing_env = Some(dir.path().join("gone.txt").display().to_string());
        assert_eq!(
            resolve_key_file_from(None, missing_env, Some(dir.path().to_path_buf())).unwrap(),
            None
        );
    }
}
