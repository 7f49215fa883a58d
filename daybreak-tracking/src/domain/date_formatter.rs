use time::{
    format_description::{self, OwnedFormatItem},
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

use super::{models::ClockTime, TimeTrackingError};

/// Converts between display dates and absolute timestamps.
pub trait DateFormatter: Send + Sync + 'static {
    /// Render a calendar date the way the form shows it.
    fn format_date_for_display(&self, date: Date) -> Result<String, TimeTrackingError>;

    /// Combine a display date with a wall-clock time into a timestamp.
    fn compose_timestamp(
        &self,
        date: &str,
        time: ClockTime,
    ) -> Result<OffsetDateTime, TimeTrackingError>;

    /// Wall-clock time of a timestamp in the display zone.
    fn clock_time_of(&self, timestamp: OffsetDateTime) -> ClockTime;

    /// Display date of a timestamp in the display zone.
    fn display_date_of(&self, timestamp: OffsetDateTime) -> Result<String, TimeTrackingError>;
}

/// `DateFormatter` backed by a `time` format description and a fixed offset.
pub struct DisplayDateFormatter {
    format: OwnedFormatItem,
    offset: UtcOffset,
}

impl DisplayDateFormatter {
    pub fn new(format: &str, offset: UtcOffset) -> Result<Self, TimeTrackingError> {
        let parsed = format_description::parse_owned::<2>(format).map_err(|e| {
            TimeTrackingError::unknown(format!("invalid date format '{format}': {e}"))
        })?;

        Ok(Self {
            format: parsed,
            offset,
        })
    }

    /// ISO dates (`2024-01-10`) in UTC.
    pub fn iso_utc() -> Result<Self, TimeTrackingError> {
        Self::new("[year]-[month]-[day]", UtcOffset::UTC)
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl DateFormatter for DisplayDateFormatter {
    fn format_date_for_display(&self, date: Date) -> Result<String, TimeTrackingError> {
        date.format(&self.format)
            .map_err(|e| TimeTrackingError::unknown(format!("failed to format {date}: {e}")))
    }

    fn compose_timestamp(
        &self,
        date: &str,
        time: ClockTime,
    ) -> Result<OffsetDateTime, TimeTrackingError> {
        let date = Date::parse(date.trim(), &self.format)
            .map_err(|_| TimeTrackingError::InvalidDate(date.to_string()))?;

        Ok(PrimitiveDateTime::new(date, time.to_time()).assume_offset(self.offset))
    }

    fn clock_time_of(&self, timestamp: OffsetDateTime) -> ClockTime {
        ClockTime::from(timestamp.to_offset(self.offset).time())
    }

    fn display_date_of(&self, timestamp: OffsetDateTime) -> Result<String, TimeTrackingError> {
        self.format_date_for_display(timestamp.to_offset(self.offset).date())
    }
}

/// Source of "today" for new forms.
pub trait Clock: Send + Sync + 'static {
    fn today(&self) -> Date;
}

pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.offset).date()
    }
}

/// Clock pinned to a single date.
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
