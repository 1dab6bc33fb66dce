use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumProperty, EnumString, IntoEnumIterator};

/// Day of the week, Monday first
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumProperty,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DayOfWeek {
    #[strum(props(short = "Mon"))]
    Monday,
    #[strum(props(short = "Tue"))]
    Tuesday,
    #[strum(props(short = "Wed"))]
    Wednesday,
    #[strum(props(short = "Thu"))]
    Thursday,
    #[strum(props(short = "Fri"))]
    Friday,
    #[strum(props(short = "Sat"))]
    Saturday,
    #[strum(props(short = "Sun"))]
    Sunday,
}

impl DayOfWeek {
    /// Three-letter column label
    pub fn short_name(&self) -> &'static str {
        self.get_str("short").unwrap_or_default()
    }

    /// 0-based position in the week, the grid's day index
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn all() -> Vec<DayOfWeek> {
        Self::iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_day_display() {
        assert_eq!(DayOfWeek::Monday.to_string(), "MONDAY");
        assert_eq!(DayOfWeek::Sunday.to_string(), "SUNDAY");
    }

    #[test]
    fn test_day_from_str() {
        assert_eq!(DayOfWeek::from_str("WEDNESDAY").unwrap(), DayOfWeek::Wednesday);
        assert_eq!(DayOfWeek::from_str("friday").unwrap(), DayOfWeek::Friday);
        assert!(DayOfWeek::from_str("FUNDAY").is_err());
    }

    #[test]
    fn test_day_index_round_trip() {
        for day in DayOfWeek::all() {
            assert_eq!(DayOfWeek::from_index(day.index()), Some(day));
        }
        assert_eq!(DayOfWeek::from_index(7), None);
    }

    #[test]
    fn test_day_short_names() {
        let names = DayOfWeek::all()
            .iter()
            .map(DayOfWeek::short_name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    }

    #[test]
    fn test_day_serde() {
        let day: DayOfWeek = serde_json::from_str(r#""THURSDAY""#).unwrap();
        assert_eq!(day, DayOfWeek::Thursday);
        assert_eq!(serde_json::to_string(&DayOfWeek::Saturday).unwrap(), r#""SATURDAY""#);
    }
}
