use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Time of day at minute precision, written `HH:MM` (24-hour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse `HH:MM`. Seconds are not accepted.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (h, m) = s.split_once(':')?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return None;
        }
        let hour: u32 = h.parse().ok()?;
        let minute: u32 = m.parse().ok()?;
        Self::new(hour, minute)
    }

    /// Add minutes, wrapping around midnight
    pub fn add_minutes(&self, minutes: i64) -> Self {
        let (time, _) = self.0.overflowing_add_signed(Duration::minutes(minutes));
        Self(time)
    }

    /// 12-hour form for display, e.g. "8:00 AM"
    pub fn format_12h(&self) -> String {
        let (pm, hour) = self.0.hour12();
        format!(
            "{}:{:02} {}",
            hour,
            self.0.minute(),
            if pm { "PM" } else { "AM" }
        )
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self(NaiveTime::MIN)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid time (expected HH:MM): {}", s))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One row of the timetable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeSlot {
    pub const DEFAULT_LENGTH_MINUTES: i64 = 60;

    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Slot of the default length beginning at `start`
    pub fn starting_at(start: TimeOfDay) -> Self {
        Self {
            start,
            end: start.add_minutes(Self::DEFAULT_LENGTH_MINUTES),
        }
    }

    /// "8:00 AM - 9:00 AM"
    pub fn label(&self) -> String {
        format!("{} - {}", self.start.format_12h(), self.end.format_12h())
    }
}

/// Editable field of a time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotField {
    Start,
    End,
}

impl std::str::FromStr for SlotField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            _ => Err(format!("unknown slot field: {} (expected start or end)", s)),
        }
    }
}

/// Starting sets of hourly slots offered when a roster is first laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTemplate {
    /// 08:00 to 15:00, seven periods
    School,
    /// 09:00 to 12:00, three periods
    HalfDay,
    /// One 09:00 period to edit from
    Custom,
}

impl SlotTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::School => "school",
            Self::HalfDay => "halfday",
            Self::Custom => "custom",
        }
    }

    pub fn slots(&self) -> Vec<TimeSlot> {
        let (first_hour, count) = match self {
            Self::School => (8, 7),
            Self::HalfDay => (9, 3),
            Self::Custom => (9, 1),
        };
        (first_hour..first_hour + count)
            .filter_map(|hour| TimeOfDay::new(hour, 0))
            .map(TimeSlot::starting_at)
            .collect()
    }
}

impl std::str::FromStr for SlotTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "school" => Ok(Self::School),
            "halfday" | "half-day" => Ok(Self::HalfDay),
            "custom" => Ok(Self::Custom),
            _ => Err(format!(
                "unknown template: {} (expected school, halfday or custom)",
                s
            )),
        }
    }
}
