use chrono::{NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// The main page greeting for a time of day.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Greeting {
    /// 06:00 to 11:59
    Morning,
    /// 12:00 to 17:59
    Day,
    /// 18:00 to 23:59
    Evening,
    /// 00:00 to 05:59
    Night,
}

impl Greeting {
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Greeting::Morning,
            12..=17 => Greeting::Day,
            18..=23 => Greeting::Evening,
            _ => Greeting::Night,
        }
    }

    pub fn at(time: NaiveDateTime) -> Self {
        Self::for_hour(time.hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Greeting::Morning => "Доброе утро",
            Greeting::Day => "Добрый день",
            Greeting::Evening => "Добрый вечер",
            Greeting::Night => "Доброй ночи",
        }
    }
}

impl Display for Greeting {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Greeting {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
