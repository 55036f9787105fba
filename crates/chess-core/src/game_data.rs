use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName {
    pub firstname: String,
    pub lastname: String,
}

impl PlayerName {
    /// Split a PGN name header. `"Carlsen, Magnus"` is last-name first;
    /// without a comma the whole value is the last name. `"?"` is unknown.
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value == "?" {
            return None;
        }
        Some(match value.split_once(',') {
            Some((last, first)) => PlayerName {
                firstname: first.trim().to_string(),
                lastname: last.trim().to_string(),
            },
            None => PlayerName {
                firstname: String::new(),
                lastname: value.to_string(),
            },
        })
    }

    /// Case-insensitive substring match on the last name.
    pub fn matches(&self, needle: &str) -> bool {
        self.lastname
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.firstname.is_empty() {
            f.write_str(&self.lastname)
        } else {
            write!(f, "{} {}", self.firstname, self.lastname)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: Option<PlayerName>,
    pub black: Option<PlayerName>,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>, // PGN "YYYY.MM.DD", only when complete
}

impl Default for GameMetadata {
    fn default() -> Self {
        Self {
            white: None,
            black: None,
            result: "*".to_string(),
            event: None,
            site: None,
            date: None,
        }
    }
}

impl GameMetadata {
    /// Either side matches `player`.
    pub fn involves(&self, player: &str) -> bool {
        [&self.white, &self.black]
            .into_iter()
            .flatten()
            .any(|name| name.matches(player))
    }
}

impl fmt::Display for GameMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |p: &Option<PlayerName>| {
            p.as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown".to_string())
        };
        write!(f, "{} vs {} : {}", side(&self.white), side(&self.black), self.result)?;
        for part in [&self.date, &self.event, &self.site].into_iter().flatten() {
            write!(f, ", {part}")?;
        }
        Ok(())
    }
}
