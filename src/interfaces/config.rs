use crate::domain::merchant::MerchantConfig;
use crate::error::{Result, SdkError};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Loads a merchant configuration from a user-supplied path.
///
/// The path is subject to the traversal guard below. `.yaml`/`.yml` files
/// are parsed as YAML, anything else as JSON.
pub fn load_merchant_config(path: &Path) -> Result<MerchantConfig> {
    let path = guard_config_path(path)?;
    let data = fs::read_to_string(&path)?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&data).map_err(|err| SdkError::Config(err.to_string()))
    } else {
        serde_json::from_str(&data).map_err(|err| SdkError::Config(err.to_string()))
    }
}

/// Rejects a relative path that still reaches outside its base after
/// lexical cleaning. Absolute paths are taken as-is: the caller chose them
/// deliberately and they cannot escape a directory they never started in.
pub fn guard_config_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cleaned = clean_path(path);
    if cleaned
        .components()
        .any(|component| component == Component::ParentDir)
    {
        return Err(SdkError::PathTraversal);
    }
    Ok(cleaned)
}

/// Lexical path normalization: drops `.` segments and folds `..` into the
/// preceding segment where one exists. Leading `..` segments survive.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal = matches!(
                    cleaned.components().next_back(),
                    Some(Component::Normal(_))
                );
                if last_is_normal {
                    cleaned.pop();
                } else {
                    cleaned.push(Component::ParentDir);
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}
