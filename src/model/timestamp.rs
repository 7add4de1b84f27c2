use std::fmt;

use serde::{Deserialize, Serialize};

pub const HOURS_PER_DAY: u64 = 24;
pub const DAYS_PER_SEASON: u64 = 21;
pub const SEASONS_PER_YEAR: u64 = 4;
pub const DAYS_PER_YEAR: u64 = DAYS_PER_SEASON * SEASONS_PER_YEAR;

const HOURS_PER_YEAR: u64 = DAYS_PER_YEAR * HOURS_PER_DAY;

/// Campaign clock reading, counted in whole hours since the start of year 0.
///
/// A campaign year is four 21-day seasons. Natural ordering is chronological.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "CampaignTimeRepr", try_from = "CampaignTimeRepr")]
pub struct CampaignTime(u64);

#[derive(Serialize, Deserialize)]
struct CampaignTimeRepr {
    year: u64,
    day: u64,
    #[serde(default)]
    hour: u64,
}

impl From<CampaignTime> for CampaignTimeRepr {
    fn from(t: CampaignTime) -> Self {
        CampaignTimeRepr {
            year: t.year(),
            day: t.day(),
            hour: t.hour(),
        }
    }
}

impl TryFrom<CampaignTimeRepr> for CampaignTime {
    type Error = String;

    fn try_from(repr: CampaignTimeRepr) -> Result<Self, Self::Error> {
        if !(1..=DAYS_PER_YEAR).contains(&repr.day) {
            return Err(format!("day out of range: {}", repr.day));
        }
        if repr.hour >= HOURS_PER_DAY {
            return Err(format!("hour out of range: {}", repr.hour));
        }
        Ok(CampaignTime::at(repr.year, repr.day, repr.hour))
    }
}

impl CampaignTime {
    /// Build a reading from year, day-of-year (1–84) and hour (0–23).
    ///
    /// Out-of-range day or hour values wrap into the following day/year.
    pub fn at(year: u64, day: u64, hour: u64) -> Self {
        let day_index = day.saturating_sub(1);
        Self(year * HOURS_PER_YEAR + day_index * HOURS_PER_DAY + hour)
    }

    /// Start of the given day of the given year.
    pub fn from_year_day(year: u64, day: u64) -> Self {
        Self::at(year, day, 0)
    }

    /// A reading `days` whole days after the campaign epoch.
    pub fn from_days(days: u64) -> Self {
        Self(days * HOURS_PER_DAY)
    }

    pub fn from_hours(hours: u64) -> Self {
        Self(hours)
    }

    pub fn year(self) -> u64 {
        self.0 / HOURS_PER_YEAR
    }

    /// Day of year (1–84).
    pub fn day(self) -> u64 {
        (self.0 % HOURS_PER_YEAR) / HOURS_PER_DAY + 1
    }

    pub fn hour(self) -> u64 {
        self.0 % HOURS_PER_DAY
    }

    /// Season of year (1–4), derived from day.
    pub fn season(self) -> u64 {
        (self.day() - 1) / DAYS_PER_SEASON + 1
    }

    pub fn as_hours(self) -> u64 {
        self.0
    }

    /// Signed number of days from `earlier` to `self` (negative if `earlier` is later).
    pub fn days_since(self, earlier: CampaignTime) -> f64 {
        (self.0 as f64 - earlier.0 as f64) / HOURS_PER_DAY as f64
    }

    pub fn plus_days(self, days: u64) -> Self {
        Self(self.0 + days * HOURS_PER_DAY)
    }
}

impl fmt::Display for CampaignTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Y{}.D{}.H{}", self.year(), self.day(), self.hour())
    }
}
