//! Wire shape of the roster: the JSON document exchanged with the server,
//! written to the local cache, and saved as project files.
//!
//! Decoding never fails on a stray entry: unknown days, slots with bad
//! times and malformed assignments are dropped with a warning, and absent
//! fields read as empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{Result, RosterError};
use crate::models::*;

use super::Roster;

pub const DOCUMENT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawDocument")]
pub struct RosterDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub people_list: Vec<String>,
    pub class_list: Vec<String>,
    pub class_colors: BTreeMap<String, String>,
    /// Day -> `"<start>-<person>"` -> assignment
    pub assignments: BTreeMap<Weekday, BTreeMap<String, Assignment>>,
    pub time_slots: Vec<TimeSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Loosely typed mirror used only while decoding
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawDocument {
    version: Option<Value>,
    people_list: Option<Vec<Value>>,
    class_list: Option<Vec<Value>>,
    class_colors: Option<BTreeMap<String, Value>>,
    assignments: Option<BTreeMap<String, Option<BTreeMap<String, Value>>>>,
    time_slots: Option<Vec<Value>>,
    saved_date: Option<Value>,
    updated_by: Option<Value>,
    updated_at: Option<Value>,
    last_updated: Option<Value>,
}

/// A version counts only when it is truthy: no empty string, `false` or `0`
fn decode_version(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn decode_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// Keep the string entries of a name list
fn decode_names(values: Option<Vec<Value>>, list: &str) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value {
            Value::String(s) => Some(s),
            other => {
                warn!(%list, entry = %other, "dropping non-text entry");
                None
            }
        })
        .collect()
}

impl From<RawDocument> for RosterDocument {
    fn from(raw: RawDocument) -> Self {
        let version = raw.version.and_then(decode_version);

        let class_colors = raw
            .class_colors
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, color)| match color {
                Value::String(c) => Some((name, c)),
                Value::Null => None,
                other => {
                    warn!(class = %name, color = %other, "dropping non-text colour");
                    None
                }
            })
            .collect();

        let mut assignments = BTreeMap::new();
        for (day_name, entries) in raw.assignments.unwrap_or_default() {
            let Some(day) = Weekday::parse(&day_name) else {
                warn!(day = %day_name, "dropping assignments for unknown day");
                continue;
            };
            let mut decoded = BTreeMap::new();
            for (key, value) in entries.unwrap_or_default() {
                match serde_json::from_value::<Assignment>(value) {
                    Ok(a) => {
                        decoded.insert(key, a);
                    }
                    Err(e) => warn!(%day, %key, error = %e, "dropping malformed assignment"),
                }
            }
            assignments.insert(day, decoded);
        }

        let time_slots = raw
            .time_slots
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<TimeSlot>(value) {
                Ok(slot) => Some(slot),
                Err(e) => {
                    warn!(error = %e, "dropping malformed time slot");
                    None
                }
            })
            .collect();

        Self {
            version,
            people_list: decode_names(raw.people_list, "peopleList"),
            class_list: decode_names(raw.class_list, "classList"),
            class_colors,
            assignments,
            time_slots,
            saved_date: decode_text(raw.saved_date),
            updated_by: decode_text(raw.updated_by),
            updated_at: decode_text(raw.updated_at).or_else(|| decode_text(raw.last_updated)),
        }
    }
}

impl RosterDocument {
    /// Parse a saved project file. Files without a version are rejected.
    pub fn parse_project(text: &str) -> Result<Self> {
        let doc: Self = serde_json::from_str(text)
            .map_err(|e| RosterError::validation(format!("Invalid project file: {}", e)))?;
        if doc.version.is_none() {
            return Err(RosterError::validation("Invalid project file: missing version"));
        }
        Ok(doc)
    }

    /// Interpret a server response body. An empty body, or one with no
    /// people list, means nothing is stored for the tenant yet.
    pub fn from_response(value: Value) -> Result<Option<Self>> {
        match &value {
            Value::Object(map) if map.contains_key("peopleList") => {}
            _ => return Ok(None),
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Roster {
    /// Snapshot the roster in document form
    pub fn to_document(&self) -> RosterDocument {
        let assignments = Weekday::ALL
            .iter()
            .map(|day| {
                let entries = self
                    .day(*day)
                    .iter()
                    .map(|(key, a)| (key.encode(), a.clone()))
                    .collect();
                (*day, entries)
            })
            .collect();

        RosterDocument {
            version: Some(DOCUMENT_VERSION.to_string()),
            people_list: self.people.clone(),
            class_list: self.classes.iter().map(|c| c.name.clone()).collect(),
            class_colors: self
                .classes
                .iter()
                .map(|c| (c.name.clone(), c.color.clone()))
                .collect(),
            assignments,
            time_slots: self.time_slots.clone(),
            ..Default::default()
        }
    }

    /// Rebuild a roster from a document.
    ///
    /// Duplicate names and repeated slot starts keep their first occurrence.
    /// A class with no stored colour gets the palette colour for its
    /// position. The colour counter restarts at the number of classes.
    pub fn from_document(doc: RosterDocument) -> Roster {
        let mut roster = Roster::new();

        for name in doc.people_list {
            if !roster.has_person(&name) {
                roster.people.push(name);
            }
        }

        for (i, name) in doc.class_list.into_iter().enumerate() {
            if roster.class(&name).is_some() {
                continue;
            }
            let color = doc
                .class_colors
                .get(&name)
                .cloned()
                .unwrap_or_else(|| palette_color(i).to_string());
            roster.classes.push(ClassTag::new(name, color));
        }
        roster.color_index = roster.classes.len();

        for slot in doc.time_slots {
            if roster.slot_index(slot.start).is_some() {
                warn!(start = %slot.start, "dropping time slot with repeated start");
                continue;
            }
            roster.time_slots.push(slot);
        }

        for (day, entries) in doc.assignments {
            for (raw_key, assignment) in entries {
                match SlotKey::decode(&raw_key) {
                    Some(key) => {
                        roster.week[day.index()].insert(key, assignment);
                    }
                    None => warn!(%day, key = %raw_key, "dropping assignment with malformed key"),
                }
            }
        }

        roster
    }
}
