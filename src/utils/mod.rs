use crate::commit::Commit;
use std::path::PathBuf;

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "config.json";

/// Get the per-user config directory (~/.rebase-drop)
pub fn get_config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .map(|home| PathBuf::from(home).join(".rebase-drop"))
}

/// Default location of the config file
pub fn default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Get current timestamp in ISO 8601 format
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Match user supplied shas (full or abbreviated) against known commits.
///
/// A reference that matches nothing, or more than one commit, is kept as a
/// bare commit with an empty summary so it never matches during planning.
pub fn match_commits(refs: &[String], known: &[Commit]) -> Vec<Commit> {
    refs.iter()
        .map(|r| {
            let mut hits = known.iter().filter(|c| c.sha.as_str().starts_with(r.as_str()));
            match (hits.next(), hits.next()) {
                (Some(commit), None) => commit.clone(),
                _ => Commit::new(r.as_str(), ""),
            }
        })
        .collect()
}
