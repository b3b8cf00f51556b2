use chrono::{Days, NaiveDate};
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use ohno::app_err;
use strum::EnumIter;

/// A trailing date range used for trend rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Window {
    Last7Days,
    Last14Days,
    Last30Days,
    Last365Days,
    AllTime,
}

impl Window {
    /// Short label used in plot file names and CLI arguments.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Last7Days => "7d",
            Self::Last14Days => "14d",
            Self::Last30Days => "30d",
            Self::Last365Days => "365d",
            Self::AllTime => "all",
        }
    }

    /// Human-readable heading used in the report.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 Days",
            Self::Last14Days => "Last 14 Days",
            Self::Last30Days => "Last 30 Days",
            Self::Last365Days => "Last 365 Days",
            Self::AllTime => "All Time",
        }
    }

    /// Number of trailing days covered, or `None` for all time.
    #[must_use]
    pub const fn days(self) -> Option<u64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last14Days => Some(14),
            Self::Last30Days => Some(30),
            Self::Last365Days => Some(365),
            Self::AllTime => None,
        }
    }

    /// Earliest date included in the window, or `None` for all time.
    ///
    /// Dates equal to the cutoff are inside the window.
    #[must_use]
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        self.days().map(|days| today - Days::new(days))
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Window {
    type Err = ohno::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Self::Last7Days),
            "14d" => Ok(Self::Last14Days),
            "30d" => Ok(Self::Last30Days),
            "365d" => Ok(Self::Last365Days),
            "all" => Ok(Self::AllTime),
            other => Err(app_err!("unknown window '{other}': expected one of 7d, 14d, 30d, 365d, all")),
        }
    }
}
