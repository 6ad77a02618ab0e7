use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Date, OffsetDateTime, UtcOffset};

/// Granularity of the dot grid
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TimeUnit {
    Day,
    Month,
    Week,
}

impl TimeUnit {
    pub(crate) const ALL: [TimeUnit; 3] = [TimeUnit::Day, TimeUnit::Month, TimeUnit::Week];

    /// Number of cells in a year's grid.  Leap years are not special-cased.
    pub(crate) fn total(self) -> u16 {
        match self {
            TimeUnit::Day => 365,
            TimeUnit::Month => 12,
            TimeUnit::Week => 52,
        }
    }

    pub(crate) fn next(self) -> TimeUnit {
        match self {
            TimeUnit::Day => TimeUnit::Month,
            TimeUnit::Month => TimeUnit::Week,
            TimeUnit::Week => TimeUnit::Day,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            TimeUnit::Day => "day",
            TimeUnit::Month => "month",
            TimeUnit::Week => "week",
        }
    }

    pub(crate) fn plural(self) -> &'static str {
        match self {
            TimeUnit::Day => "days",
            TimeUnit::Month => "months",
            TimeUnit::Week => "weeks",
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            TimeUnit::Day => "Day",
            TimeUnit::Month => "Month",
            TimeUnit::Week => "Week",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TimeUnit {
    type Err = ParseTimeUnitError;

    fn from_str(s: &str) -> Result<TimeUnit, ParseTimeUnitError> {
        match s.to_ascii_lowercase().as_str() {
            "d" | "day" | "days" | "year" => Ok(TimeUnit::Day),
            "m" | "month" | "months" => Ok(TimeUnit::Month),
            "w" | "week" | "weeks" => Ok(TimeUnit::Week),
            _ => Err(ParseTimeUnitError),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("expected one of \"day\", \"month\", or \"week\"")]
pub(crate) struct ParseTimeUnitError;

/// Visual state of a single grid cell
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum CellState {
    Past,
    Current,
    Future,
}

/// How far through the year a given date is, measured in `unit`s.
///
/// `elapsed` is the number of units completed before the one containing the
/// date, which is also the 0-based index of the date's own cell.  It is at
/// most `unit.total()`; when it equals the total, every cell is in the past.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Progress {
    unit: TimeUnit,
    elapsed: u16,
}

impl Progress {
    pub(crate) fn for_date(unit: TimeUnit, date: Date) -> Progress {
        let total = unit.total();
        let elapsed = match unit {
            TimeUnit::Day => date.ordinal() - 1,
            TimeUnit::Month => u16::from(u8::from(date.month())) - 1,
            TimeUnit::Week => {
                let (iso_year, week, _) = date.to_iso_week_date();
                match iso_year.cmp(&date.year()) {
                    // Early January days still in the previous year's last
                    // ISO week
                    std::cmp::Ordering::Less => 0,
                    std::cmp::Ordering::Equal => u16::from(week) - 1,
                    // Late December days already in next year's week 1
                    std::cmp::Ordering::Greater => {
                        u16::from(time::util::weeks_in_year(date.year()))
                    }
                }
            }
        };
        Progress {
            unit,
            elapsed: elapsed.min(total),
        }
    }

    pub(crate) fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub(crate) fn elapsed(&self) -> u16 {
        self.elapsed
    }

    pub(crate) fn total(&self) -> u16 {
        self.unit.total()
    }

    /// Number of units left after the current one
    pub(crate) fn remaining(&self) -> u16 {
        self.total().saturating_sub(self.elapsed + 1)
    }

    /// Index of the cell containing the date, if the grid has one
    pub(crate) fn current(&self) -> Option<u16> {
        (self.elapsed < self.total()).then_some(self.elapsed)
    }

    pub(crate) fn classify(&self, index: u16) -> CellState {
        match index.cmp(&self.elapsed) {
            std::cmp::Ordering::Less => CellState::Past,
            std::cmp::Ordering::Equal => CellState::Current,
            std::cmp::Ordering::Greater => CellState::Future,
        }
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = (u16, CellState)> + '_ {
        (0..self.total()).map(move |i| (i, self.classify(i)))
    }
}

/// Source of "today"
pub(crate) trait Clock {
    fn today(&self) -> Date;
}

/// Reads the wall clock, interpreting it in a UTC offset captured at startup
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub(crate) fn new(offset: UtcOffset) -> SystemClock {
        SystemClock { offset }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.offset).date()
    }
}

/// A clock stuck on one date
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FixedClock(pub(crate) Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

/// The clock selected on the command line
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AnyClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl Clock for AnyClock {
    fn today(&self) -> Date {
        match self {
            AnyClock::System(c) => c.today(),
            AnyClock::Fixed(c) => c.today(),
        }
    }
}

/// `"Tuesday, 22.04"`
pub(crate) fn header_date(date: Date) -> String {
    format!(
        "{}, {:02}.{:02}",
        date.weekday(),
        date.day(),
        u8::from(date.month())
    )
}
