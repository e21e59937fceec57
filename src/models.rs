use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Health,
    Fitness,
    Mindfulness,
    Productivity,
    Personal,
    Social,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: u64,
    pub name: String,
    pub icon: String,
    pub category: Category,
    pub target: f64,
    pub unit: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// One slot per weekday, Mon..Sun.
    pub history: [f64; 7],
    pub color: String,
}

impl Habit {
    pub fn meets_target(&self, day: usize) -> bool {
        self.history[day] >= self.target
    }

    pub fn snapshot(&self) -> HabitSnapshot {
        HabitSnapshot {
            id: self.id,
            name: self.name.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// Copy of the habit fields a reminder needs, taken when the reminder is
/// created. Later habit changes do not reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSnapshot {
    #[serde(rename = "habitId")]
    pub id: u64,
    #[serde(rename = "habitName")]
    pub name: String,
    #[serde(rename = "habitIcon")]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: u64,
    #[serde(flatten)]
    pub habit: HabitSnapshot,
    pub time: TimeOfDay,
    pub message: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Wall-clock hour and minute, serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeOfDayError> {
        if hour > 23 || minute > 59 {
            return Err(TimeOfDayError(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn from_time<T: Timelike>(time: &T) -> Self {
        // Timelike guarantees hour < 24 and minute < 60.
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || TimeOfDayError(value.to_string());
        let (hour, minute) = value.split_once(':').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hour) || !two_digits(minute) {
            return Err(invalid());
        }
        let hour = hour.parse().map_err(|_| invalid())?;
        let minute = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeOfDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOfDayError(pub String);

impl fmt::Display for TimeOfDayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time of day '{}', expected HH:MM", self.0)
    }
}

impl std::error::Error for TimeOfDayError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than the two known literals reads back as the default.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    #[default]
    Default,
    Granted,
    Denied,
}

impl FromStr for NotificationPermission {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            other => Err(format!("unknown notification permission '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub reminder_id: u64,
    pub title: String,
    pub body: String,
    pub icon: String,
    pub delivered_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_target")]
    pub target: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_target() -> f64 {
    1.0
}

fn default_unit() -> String {
    "times".to_string()
}

fn default_icon() -> String {
    "⭐".to_string()
}

fn default_color() -> String {
    "#6366f1".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReminderRequest {
    pub habit_id: u64,
    pub time: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemindersResponse {
    pub reminders: Vec<Reminder>,
    pub unread: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub permission: NotificationPermission,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeBody {
    pub theme: Theme,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionBody {
    pub permission: NotificationPermission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakTier {
    High,
    Medium,
    Low,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPoint {
    pub day: &'static str,
    pub value: f64,
    pub met_target: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub id: u64,
    pub name: String,
    pub icon: String,
    pub weekly_average: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub badge: StreakTier,
    pub badge_glyph: &'static str,
    pub week: Vec<DayPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenTimeItem {
    pub name: &'static str,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodPoint {
    pub day: &'static str,
    pub value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub habits: Vec<HabitSummary>,
    pub habits_on_track: usize,
    pub habit_count: usize,
    pub screen_time: Vec<ScreenTimeItem>,
    pub total_screen_time: f64,
    pub mood: Vec<MoodPoint>,
    pub average_mood: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_parses_and_formats() {
        let time: TimeOfDay = "09:05".parse().unwrap();
        assert_eq!(time.hour(), 9);
        assert_eq!(time.minute(), 5);
        assert_eq!(time.to_string(), "09:05");
    }

    #[test]
    fn time_of_day_rejects_out_of_range_and_malformed() {
        for raw in ["24:00", "12:60", "9:00", "0900", "ab:cd", "", "12:000"] {
            assert!(raw.parse::<TimeOfDay>().is_err(), "accepted {raw}");
        }
    }

    #[test]
    fn reminder_serializes_with_flat_snapshot_fields() {
        let reminder = Reminder {
            id: 7,
            habit: HabitSnapshot {
                id: 3,
                name: "Exercise".into(),
                icon: "🏃".into(),
            },
            time: "18:30".parse().unwrap(),
            message: "go".into(),
            is_active: true,
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
        };

        let value = serde_json::to_value(&reminder).unwrap();
        assert_eq!(value["habitId"], 3);
        assert_eq!(value["habitName"], "Exercise");
        assert_eq!(value["time"], "18:30");
        assert_eq!(value["isActive"], true);
    }

    #[test]
    fn theme_falls_back_to_light() {
        assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("purple")), Theme::Light);
        assert_eq!(Theme::from_stored(None), Theme::Light);
    }
}
