//! Fixed choice lists offered by the dining wizard.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of selectable dates, starting with today.
pub const BOOKABLE_DAYS: u64 = 30;

/// Minutes after midnight for every bookable slot: lunch 12:00–14:30 and
/// dinner 18:00–21:00, every half hour.
const SLOT_MINUTES: [u16; 13] = [
    720, 750, 780, 810, 840, 870, 1080, 1110, 1140, 1170, 1200, 1230, 1260,
];

/// Raised when a submitted choice is not one of the fixed options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownOption {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Dates offered on the date/time step for a given `today`.
pub fn bookable_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..BOOKABLE_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .collect()
}

/// A half-hour reservation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema)]
#[schema(value_type = String, example = "7:00 PM")]
pub struct TimeSlot(u16);

impl TimeSlot {
    /// Every slot in chronological order.
    pub fn all() -> impl Iterator<Item = Self> {
        SLOT_MINUTES.into_iter().map(Self)
    }

    /// Parse a 12-hour label such as `"7:00 PM"`.
    ///
    /// # Examples
    /// ```
    /// use eatopia::domain::TimeSlot;
    ///
    /// let slot = TimeSlot::parse("7:00 PM").expect("dinner slot");
    /// assert_eq!(slot.label(), "7:00 PM");
    /// assert!(TimeSlot::parse("4:00 PM").is_err());
    /// ```
    pub fn parse(label: &str) -> Result<Self, UnknownOption> {
        let trimmed = label.trim();
        Self::all()
            .find(|slot| slot.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownOption::new("time slot", label))
    }

    /// Display label in 12-hour form.
    pub fn label(self) -> String {
        let hours = self.0 / 60;
        let minutes = self.0 % 60;
        let suffix = if hours >= 12 { "PM" } else { "AM" };
        let display_hour = match hours % 12 {
            0 => 12,
            other => other,
        };
        format!("{display_hour}:{minutes:02} {suffix}")
    }

    /// Wall-clock time of the slot.
    pub fn time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.0 / 60), u32::from(self.0 % 60), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every option in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire identifier.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Human-readable label.
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str() == s)
                    .ok_or_else(|| UnknownOption::new($kind, s))
            }
        }
    };
}

choice_enum! {
    /// Who is coming along.
    GroupType, "group type" {
        Solo => ("solo", "Solo"),
        Couple => ("couple", "Couple"),
        Friends => ("friends", "Friends"),
        Family => ("family", "Family"),
    }
}

choice_enum! {
    /// Desired atmosphere.
    Vibe, "vibe" {
        Chill => ("chill", "Chill"),
        Romantic => ("romantic", "Romantic"),
        Energetic => ("energetic", "Energetic"),
        LoudAf => ("loud-af", "Loud AF"),
        Upscale => ("upscale", "Upscale"),
        Casual => ("casual", "Casual"),
    }
}

impl GroupType {
    /// Head count implied by the group, when it is fixed.
    pub const fn implied_guests(self) -> Option<u16> {
        match self {
            Self::Solo => Some(1),
            Self::Couple => Some(2),
            Self::Friends | Self::Family => None,
        }
    }
}
