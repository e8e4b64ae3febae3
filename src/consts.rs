/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Length of the sexagenary cycle
pub const CYCLE_LEN: u8 = 60;
/// Number of heavenly stems
pub const STEM_COUNT: u8 = 10;
/// Number of earthly branches
pub const BRANCH_COUNT: u8 = 12;

/// Solar year whose sexagenary index is 1 (甲子)
pub const CYCLE_EPOCH_YEAR: i32 = 1984;

/// Day of February used as risshun for years missing from the table
pub const DEFAULT_RISSHUN_DAY: u8 = 4;

/// Months walked backward looking for a day anchor before giving up
pub const MAX_ANCHOR_LOOKBACK: u32 = 36;

/// First year covered by the bundled tables
pub const FIRST_TABULATED_YEAR: u16 = 1900;
/// Last year covered by the bundled tables
pub const LAST_TABULATED_YEAR: u16 = 2033;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Range separator (ISO 8601 extended format)
pub const RANGE_SEPARATOR: char = '/';
