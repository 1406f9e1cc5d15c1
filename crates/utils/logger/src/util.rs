use crate::LoggingError;
use time::UtcOffset;

/// Helper function to create a UtcOffset from hours
///
/// # Examples
///
/// ```
/// use logger::utc_offset_hours;
///
/// let utc_plus_7 = utc_offset_hours(7).unwrap();   // UTC+7 (Jakarta, Bangkok)
/// let utc = utc_offset_hours(0).unwrap();          // UTC
/// assert!(utc_offset_hours(30).is_err());
/// ```
pub fn utc_offset_hours(hours: i8) -> Result<UtcOffset, LoggingError> {
    utc_offset_hms(hours, 0, 0)
}

/// Helper function to create a UtcOffset from hours and minutes
///
/// ```
/// use logger::utc_offset_hms;
///
/// let india = utc_offset_hms(5, 30, 0).unwrap(); // UTC+5:30
/// assert_eq!(india.whole_minutes(), 330);
/// ```
pub fn utc_offset_hms(hours: i8, minutes: i8, seconds: i8) -> Result<UtcOffset, LoggingError> {
    UtcOffset::from_hms(hours, minutes, seconds).map_err(|e| LoggingError::InvalidTimezone {
        hours,
        message: e.to_string(),
    })
}
