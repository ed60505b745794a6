use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_SINCE_DAYS: u32 = 7;
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Cutoff for "recent": anything at or before it is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Since {
    DaysAgo(u32),
    At(DateTime<Utc>),
}

impl Since {
    /// Cutoffs further back than chrono can represent clamp to the earliest
    /// representable instant.
    pub fn resolve(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Since::DaysAgo(days) => Duration::try_days(i64::from(days))
                .and_then(|back| now.checked_sub_signed(back))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            Since::At(at) => at,
        }
    }
}

impl Default for Since {
    fn default() -> Self {
        Since::DaysAgo(DEFAULT_SINCE_DAYS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RediscoverOptions {
    pub since: Since,
    /// Default sample size for `Rediscover::next_batch`
    pub batch_size: usize,
}

impl Default for RediscoverOptions {
    fn default() -> Self {
        Self {
            since: Since::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
