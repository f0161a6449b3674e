//! Conversation log with JSON file persistence. The log is rewritten in
//! full after every append; a missing or unreadable file yields a fresh
//! log seeded with the greeting.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::responses::GREETING;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn sender_name(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "ADTU Assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Wall-clock stamp shown next to the message, e.g. "14:03:27".
    pub fn time_of_day(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

/// Ordered message log backed by a JSON file. The first entry is always
/// the greeting; clearing truncates back to it rather than emptying the log.
pub struct ConversationStore {
    entries: Vec<ConversationEntry>,
    path: PathBuf,
}

impl ConversationStore {
    /// Reads the log at `path`, seeding a fresh greeting-only log when the
    /// file is missing or unreadable. A corrupt log is logged and replaced
    /// rather than aborting startup.
    pub fn load(path: PathBuf) -> Self {
        let entries = match read_entries(&path) {
            Ok(Some(entries)) if !entries.is_empty() => entries,
            Ok(_) => Self::seed(),
            Err(e) => {
                tracing::warn!("discarding unreadable history at {}: {e:#}", path.display());
                Self::seed()
            }
        };
        Self { entries, path }
    }

    fn seed() -> Vec<ConversationEntry> {
        vec![ConversationEntry::new(Role::Assistant, GREETING)]
    }

    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("could not determine data directory"))?
            .join("adtu-campus-chat");
        Ok(dir.join("history.json"))
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends and persists. Persistence failures are logged, not fatal;
    /// the in-memory log stays authoritative for the session.
    pub fn append(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
        if let Err(e) = self.save() {
            tracing::warn!("could not persist chat history: {e:#}");
        }
    }

    /// Drops everything after the greeting and persists the truncated log.
    pub fn clear_to_first(&mut self) {
        self.entries.truncate(1);
        if let Err(e) = self.save() {
            tracing::warn!("could not persist cleared history: {e:#}");
        }
    }

    /// Flat text rendering of the whole log, suitable for saving to a file.
    pub fn export_text(&self, generated: DateTime<Local>) -> String {
        let mut out = String::new();
        out.push_str("ADTU Smart Campus Chatbot - Conversation History\n");
        out.push_str("Assam Down Town University\n");
        out.push_str(&format!(
            "Generated on: {}\n",
            generated.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str("Website: www.adtu.in\n");
        out.push_str("Contact: +91-361-22334455\n\n");
        for entry in &self.entries {
            out.push_str(&format!(
                "[{}] {}: {}\n",
                entry.time_of_day(),
                entry.role.sender_name(),
                entry.text
            ));
        }
        out
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Option<Vec<ConversationEntry>>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let entries = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConversationStore {
        ConversationStore::load(dir.path().join("history.json"))
    }

    #[test]
    fn test_fresh_store_seeds_greeting() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].role, Role::Assistant);
        assert_eq!(store.entries()[0].text, GREETING);
    }

    #[test]
    fn test_append_persists_across_reload() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(ConversationEntry::new(Role::User, "hostel fees?"));
        store.append(ConversationEntry::new(Role::Assistant, "Hostel fees are..."));

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.entries()[1].text, "hostel fees?");
        assert_eq!(reloaded.entries()[2].role, Role::Assistant);
    }

    #[test]
    fn test_clear_keeps_only_greeting() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(ConversationEntry::new(Role::User, "one"));
        store.append(ConversationEntry::new(Role::Assistant, "two"));
        store.clear_to_first();

        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].text, GREETING);

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_malformed_file_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ not json").unwrap();

        let store = ConversationStore::load(path);
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].text, GREETING);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let entry = ConversationEntry::new(Role::User, "hi");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"role\":\"user\""));

        let back: ConversationEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.role, Role::User);
        assert_eq!(back.timestamp, entry.timestamp);
    }

    #[test]
    fn test_export_text_layout() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(ConversationEntry::new(Role::User, "placement stats?"));

        let text = store.export_text(Local::now());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ADTU Smart Campus Chatbot - Conversation History");
        assert_eq!(lines[1], "Assam Down Town University");
        assert!(lines[2].starts_with("Generated on: "));
        assert_eq!(lines[3], "Website: www.adtu.in");
        assert_eq!(lines[4], "Contact: +91-361-22334455");
        assert_eq!(lines[5], "");

        let body = regex::Regex::new(r"^\[\d{2}:\d{2}:\d{2}\] (You|ADTU Assistant): .+$").unwrap();
        assert!(body.is_match(lines[6]), "bad entry line: {}", lines[6]);
        assert!(lines[7].ends_with("placement stats?"));
    }
}
