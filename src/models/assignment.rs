use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::TimeOfDay;

/// Cell address within one day: a slot start and a person
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub start: TimeOfDay,
    pub person: String,
}

impl SlotKey {
    pub fn new(start: TimeOfDay, person: impl Into<String>) -> Self {
        Self {
            start,
            person: person.into(),
        }
    }

    /// Document form, `"<start>-<person>"`
    pub fn encode(&self) -> String {
        format!("{}-{}", self.start, self.person)
    }

    /// Parse the document form. `HH:MM` has no hyphen, so the first one
    /// separates start from person even if the name contains hyphens.
    pub fn decode(s: &str) -> Option<Self> {
        let (start, person) = s.split_once('-')?;
        if person.is_empty() {
            return None;
        }
        Some(Self {
            start: TimeOfDay::parse(start)?,
            person: person.to_string(),
        })
    }
}

/// What a person is doing in one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(default = "default_duration", deserialize_with = "lenient_duration")]
    pub duration: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
}

fn default_duration() -> u32 {
    Assignment::DEFAULT_DURATION
}

/// Older documents carry durations as strings, floats, or null
fn lenient_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let minutes = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(minutes.unwrap_or(Assignment::DEFAULT_DURATION))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Assignment {
    pub const DEFAULT_DURATION: u32 = 60;

    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            duration: Self::DEFAULT_DURATION,
            notes: String::new(),
        }
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Cell text for grids and sheets: class, non-default duration, notes
    pub fn cell_text(&self) -> String {
        let mut text = self.class_name.clone();
        if self.duration != Self::DEFAULT_DURATION {
            text.push_str(&format!(" ({}min)", self.duration));
        }
        if !self.notes.is_empty() {
            text.push('\n');
            text.push_str(&self.notes);
        }
        text
    }
}
