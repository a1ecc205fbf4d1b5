//! Firefox profile discovery
//!
//! Locates the profile directory that receives the generated `user.js`.

use anyhow::Context;
use configparser::ini::Ini;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Firefox profile information parsed from profiles.ini
#[derive(Debug, Clone)]
struct FirefoxProfile {
    name: String,
    path: PathBuf,
    is_relative: bool,
    is_default: bool,
}

impl FirefoxProfile {
    fn full_path(&self, profiles_dir: &Path) -> PathBuf {
        if self.is_relative {
            profiles_dir.join(&self.path)
        } else {
            self.path.clone()
        }
    }
}

/// Public profile information for listing
#[derive(Debug, Serialize)]
pub struct ProfileInfo {
    pub name: String,
    pub path: PathBuf,
    pub is_default: bool,
    pub is_relative: bool,
    /// Install section that uses this profile as its default (Firefox 67+)
    pub locked_to_install: Option<String>,
    /// Whether the profile already has a user.js
    pub has_user_js: bool,
}

/// Find the Firefox profile directory based on the profile name
///
/// `"default"` resolves to the profile an install section points at, then to
/// the profile flagged `Default=1`.
pub fn find_profile_path(
    profile_name: &str,
    profiles_dir_opt: Option<&Path>,
) -> Result<PathBuf, anyhow::Error> {
    let profiles_dir = get_profiles_directory(profiles_dir_opt)?;
    let profiles_ini = profiles_dir.join("profiles.ini");

    if profiles_ini.exists() {
        let ini = load_ini(&profiles_ini)?;
        let profiles = parse_profiles(&ini);

        if let Some(profile) = profiles.iter().find(|p| p.name == profile_name) {
            let full_path = profile.full_path(&profiles_dir);
            if full_path.exists() {
                tracing::debug!(path = %full_path.display(), "profile found in profiles.ini");
                return Ok(full_path);
            }
        }

        if profile_name == "default" {
            if let Some(path) = default_profile_path(&ini, &profiles_dir, &profiles) {
                tracing::debug!(path = %path.display(), "using default profile");
                return Ok(path);
            }
        }
    }

    scan_profiles_directory(&profiles_dir, profile_name)
}

/// Load and parse profiles.ini
fn load_ini(ini_path: &Path) -> Result<Ini, anyhow::Error> {
    let content = std::fs::read_to_string(ini_path)
        .with_context(|| format!("Failed to read profiles.ini from {}", ini_path.display()))?;

    let mut ini = Ini::new();
    ini.read(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse profiles.ini: {}", e))?;
    Ok(ini)
}

/// Extract `[ProfileN]` sections
fn parse_profiles(ini: &Ini) -> Vec<FirefoxProfile> {
    let mut profiles = Vec::new();

    // configparser lowercases section names
    for sec_name in ini.sections() {
        if !sec_name.starts_with("profile") {
            continue;
        }
        let name = ini.get(&sec_name, "Name").unwrap_or_default();
        let path_str = ini.get(&sec_name, "Path").unwrap_or_default();
        let is_relative = ini
            .getuint(&sec_name, "IsRelative")
            .ok()
            .flatten()
            .unwrap_or(1)
            == 1;
        let is_default = ini
            .getuint(&sec_name, "Default")
            .ok()
            .flatten()
            .unwrap_or(0)
            == 1;

        if !name.is_empty() && !path_str.is_empty() {
            profiles.push(FirefoxProfile {
                name,
                path: PathBuf::from(path_str),
                is_relative,
                is_default,
            });
        }
    }

    profiles
}

/// Install sections (`[Install...]` or bare hashes) mapped to their default profile path
fn parse_installs(ini: &Ini) -> HashMap<String, String> {
    ini.sections()
        .into_iter()
        .filter(|sec| !sec.starts_with("profile") && sec != "general")
        .filter_map(|sec| ini.get(&sec, "Default").map(|default| (sec, default)))
        .collect()
}

fn default_profile_path(
    ini: &Ini,
    profiles_dir: &Path,
    profiles: &[FirefoxProfile],
) -> Option<PathBuf> {
    let mut installs: Vec<(String, String)> = parse_installs(ini).into_iter().collect();
    installs.sort();

    for (install, default_path) in installs {
        let candidate = PathBuf::from(&default_path);
        let full_path = if candidate.is_absolute() {
            candidate
        } else {
            profiles_dir.join(candidate)
        };
        if full_path.exists() {
            tracing::debug!(install = %install, "default profile from install section");
            return Some(full_path);
        }
    }

    profiles
        .iter()
        .find(|p| p.is_default)
        .map(|p| p.full_path(profiles_dir))
        .filter(|p| p.exists())
}

/// Fallback: scan the profiles directory for `xxxxxxxx.<name>` folders
fn scan_profiles_directory(
    profiles_dir: &Path,
    profile_name: &str,
) -> Result<PathBuf, anyhow::Error> {
    let entries = std::fs::read_dir(profiles_dir).with_context(|| {
        format!(
            "Failed to read profiles directory: {}",
            profiles_dir.display()
        )
    })?;

    let mut matches: Vec<PathBuf> = Vec::new();

    for entry in entries {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let dir_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if dir_name == profile_name {
            return Ok(path);
        }
        if dir_name.ends_with(&format!(".{}", profile_name)) {
            matches.push(path);
        }
    }

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(anyhow::anyhow!(
            "Profile '{}' not found in {}. \
             Use 'ffov profiles' to see available profiles.",
            profile_name,
            profiles_dir.display()
        )),
        _ => {
            let match_names: Vec<&str> = matches
                .iter()
                .filter_map(|p| p.file_name().and_then(|s| s.to_str()))
                .collect();
            Err(anyhow::anyhow!(
                "Multiple profiles match '{}': {}. \
                 Please use the exact profile name from 'ffov profiles'.",
                profile_name,
                match_names.join(", ")
            ))
        }
    }
}

/// List all available Firefox profiles
pub fn list_profiles(profiles_dir_opt: Option<&Path>) -> Result<Vec<ProfileInfo>, anyhow::Error> {
    let profiles_dir = get_profiles_directory(profiles_dir_opt)?;
    let profiles_ini = profiles_dir.join("profiles.ini");

    if !profiles_ini.exists() {
        return Err(anyhow::anyhow!(
            "profiles.ini not found at {}. \
             Firefox may not be installed or this is not a standard Firefox setup.",
            profiles_ini.display()
        ));
    }

    let ini = load_ini(&profiles_ini)?;
    let installs = parse_installs(&ini);

    let profile_infos = parse_profiles(&ini)
        .into_iter()
        .map(|p| {
            let path_string = p.path.to_string_lossy().to_string();
            let locked_to = installs
                .iter()
                .find(|(_, default_path)| **default_path == path_string)
                .map(|(hash, _)| hash.clone());
            let has_user_js = get_user_js_path(&p.full_path(&profiles_dir)).exists();

            ProfileInfo {
                name: p.name,
                path: p.path,
                is_default: p.is_default,
                is_relative: p.is_relative,
                locked_to_install: locked_to,
                has_user_js,
            }
        })
        .collect();

    Ok(profile_infos)
}

/// Resolve the directory holding profiles.ini
///
/// An explicit path wins over `MOZ_PROFILES_DIR`, which wins over the
/// platform's default Firefox location.
pub fn get_profiles_directory(manual_path: Option<&Path>) -> Result<PathBuf, anyhow::Error> {
    let explicit = manual_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("MOZ_PROFILES_DIR").map(PathBuf::from));

    match explicit {
        Some(path) => check_profiles_dir(path),
        None => platform_profiles_dir(),
    }
}

fn check_profiles_dir(path: PathBuf) -> Result<PathBuf, anyhow::Error> {
    if path.is_dir() {
        return Ok(path);
    }
    let problem = if path.exists() {
        "is not a directory"
    } else {
        "does not exist"
    };
    anyhow::bail!(
        "Profiles directory {} {}. Pass --profiles-dir or set MOZ_PROFILES_DIR \
         to the folder that contains profiles.ini.",
        path.display(),
        problem
    )
}

fn platform_profiles_dir() -> Result<PathBuf, anyhow::Error> {
    let (var, relative) = if cfg!(target_os = "windows") {
        ("APPDATA", "Mozilla/Firefox")
    } else if cfg!(target_os = "macos") {
        ("HOME", "Library/Application Support/Firefox")
    } else {
        ("HOME", ".mozilla/firefox")
    };

    let base = std::env::var_os(var).with_context(|| {
        format!(
            "Cannot locate Firefox profiles: {} is not set. Use --profiles-dir instead.",
            var
        )
    })?;
    Ok(PathBuf::from(base).join(relative))
}

/// Get the path to user.js for a given profile
pub fn get_user_js_path(profile_path: &Path) -> PathBuf {
    profile_path.join("user.js")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROFILES_INI: &str = r#"
[General]
StartWithLastProfile=1
Version=2

[Profile0]
Name=default
IsRelative=1
Path=Profiles/abcdefgh.default
Default=1

[Profile1]
Name=hardened
IsRelative=1
Path=Profiles/ijklmnop.hardened

[InstallABCDEF0123456789]
Default=Profiles/ijklmnop.hardened
Locked=1
"#;

    fn profiles_fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("profiles.ini"), PROFILES_INI).unwrap();
        std::fs::create_dir_all(dir.path().join("Profiles/abcdefgh.default")).unwrap();
        std::fs::create_dir_all(dir.path().join("Profiles/ijklmnop.hardened")).unwrap();
        dir
    }

    #[test]
    fn test_get_user_js_path() {
        let profile_path = PathBuf::from("/home/user/.mozilla/firefox/test.default");
        assert_eq!(
            get_user_js_path(&profile_path),
            PathBuf::from("/home/user/.mozilla/firefox/test.default/user.js")
        );
    }

    #[test]
    fn test_find_profile_by_name() {
        let dir = profiles_fixture();
        let path = find_profile_path("hardened", Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("Profiles/ijklmnop.hardened"));
    }

    #[test]
    fn test_default_prefers_exact_name() {
        let dir = profiles_fixture();
        let path = find_profile_path("default", Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("Profiles/abcdefgh.default"));
    }

    #[test]
    fn test_default_uses_install_section() {
        let dir = TempDir::new().unwrap();
        let ini = PROFILES_INI.replace("Name=default", "Name=personal");
        std::fs::write(dir.path().join("profiles.ini"), ini).unwrap();
        std::fs::create_dir_all(dir.path().join("Profiles/abcdefgh.default")).unwrap();
        std::fs::create_dir_all(dir.path().join("Profiles/ijklmnop.hardened")).unwrap();

        let path = find_profile_path("default", Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("Profiles/ijklmnop.hardened"));
    }

    #[test]
    fn test_scan_fallback() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("x1y2z3.work")).unwrap();
        let path = find_profile_path("work", Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("x1y2z3.work"));
    }

    #[test]
    fn test_scan_not_found() {
        let dir = TempDir::new().unwrap();
        let err = find_profile_path("missing", Some(dir.path())).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_list_profiles() {
        let dir = profiles_fixture();
        std::fs::write(
            dir.path().join("Profiles/ijklmnop.hardened/user.js"),
            "user_pref(\"a.b\", 1);\n",
        )
        .unwrap();

        let profiles = list_profiles(Some(dir.path())).unwrap();
        assert_eq!(profiles.len(), 2);

        let hardened = profiles.iter().find(|p| p.name == "hardened").unwrap();
        assert!(hardened.has_user_js);
        assert_eq!(
            hardened.locked_to_install.as_deref(),
            Some("installabcdef0123456789")
        );

        let default = profiles.iter().find(|p| p.name == "default").unwrap();
        assert!(default.is_default);
        assert!(!default.has_user_js);
    }

    #[test]
    fn test_list_profiles_without_ini() {
        let dir = TempDir::new().unwrap();
        assert!(list_profiles(Some(dir.path())).is_err());
    }

    #[test]
    fn test_profiles_dir_validation_nonexistent() {
        let result = get_profiles_directory(Some(Path::new("/nonexistent/path")));
        let error_msg = result.unwrap_err().to_string();
        assert!(error_msg.contains("does not exist"));
        assert!(error_msg.contains("/nonexistent/path"));
    }

    #[test]
    fn test_profiles_dir_validation_file_not_directory() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let result = get_profiles_directory(Some(temp_file.path()));
        assert!(result.unwrap_err().to_string().contains("not a directory"));
    }
}
