//! Helpers to convert a raw amount of seconds into minutes and seconds.
//!
//! Only the sub-hour part of a time value is represented: the hour component is dropped and
//! values of one hour or more wrap around, so `3661` seconds are displayed as `1:01`.
//!
//! Negative values use floor modulo semantics, which means they wrap into the same
//! `0..60` minute and second window. For example, `-65` seconds yield `(58, 55)`.
use core::fmt;

pub const SECONDS_PER_HOUR: i64 = 3600;
pub const SECONDS_PER_MINUTE: i64 = 60;
pub const DEFAULT_SEPARATOR: &str = ":";

/// Split a time in seconds into its minute and second components inside the current hour.
pub fn get_time_min_sec(time: i64) -> (i64, i64) {
    let within_hour = time.rem_euclid(SECONDS_PER_HOUR);
    (
        within_hour / SECONDS_PER_MINUTE,
        within_hour % SECONDS_PER_MINUTE,
    )
}

/// Write the time as `m{separator}ss` into an arbitrary [fmt::Write] target. This does not
/// require an allocator.
pub fn write_formatted_time(
    writer: &mut impl fmt::Write,
    time: i64,
    separator: &str,
) -> fmt::Result {
    let (minutes, seconds) = get_time_min_sec(time);
    write!(writer, "{minutes}{separator}{seconds:02}")
}

/// Format the time as `m{separator}ss`, for example `1:05` for 65 seconds when using the
/// [DEFAULT_SEPARATOR].
#[cfg(feature = "alloc")]
pub fn get_formatted_time(time: i64, separator: &str) -> alloc::string::String {
    let (minutes, seconds) = get_time_min_sec(time);
    alloc::format!("{minutes}{separator}{seconds:02}")
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_min_sec_basic() {
        assert_eq!(get_time_min_sec(0), (0, 0));
        assert_eq!(get_time_min_sec(59), (0, 59));
        assert_eq!(get_time_min_sec(60), (1, 0));
        assert_eq!(get_time_min_sec(65), (1, 5));
        assert_eq!(get_time_min_sec(3599), (59, 59));
    }

    #[test]
    fn test_min_sec_wraps_at_hour() {
        assert_eq!(get_time_min_sec(3600), (0, 0));
        assert_eq!(get_time_min_sec(3661), (1, 1));
        assert_eq!(get_time_min_sec(7325), (2, 5));
    }

    #[test]
    fn test_min_sec_negative_floor_modulo() {
        assert_eq!(get_time_min_sec(-1), (59, 59));
        assert_eq!(get_time_min_sec(-65), (58, 55));
        assert_eq!(get_time_min_sec(-3600), (0, 0));
        assert_eq!(get_time_min_sec(i64::MIN), get_time_min_sec(i64::MIN.rem_euclid(3600)));
    }

    #[test]
    fn test_min_sec_random_non_negative() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let time: i64 = rng.gen_range(0..=i64::MAX);
            let (minutes, seconds) = get_time_min_sec(time);
            assert_eq!(minutes, (time % 3600) / 60);
            assert_eq!(seconds, (time % 3600) % 60);
        }
    }

    #[test]
    fn test_formatted_time() {
        assert_eq!(get_formatted_time(65, DEFAULT_SEPARATOR), "1:05");
        assert_eq!(get_formatted_time(65, "."), "1.05");
        assert_eq!(get_formatted_time(3661, DEFAULT_SEPARATOR), "1:01");
        assert_eq!(get_formatted_time(0, DEFAULT_SEPARATOR), "0:00");
        assert_eq!(get_formatted_time(600, " min "), "10 min 00");
        assert_eq!(get_formatted_time(-65, DEFAULT_SEPARATOR), "58:55");
    }

    #[test]
    fn test_write_formatted_time_into_fixed_buffer() {
        struct FixedBuf {
            buf: [u8; 8],
            len: usize,
        }

        impl fmt::Write for FixedBuf {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                let end = self.len + s.len();
                if end > self.buf.len() {
                    return Err(fmt::Error);
                }
                self.buf[self.len..end].copy_from_slice(s.as_bytes());
                self.len = end;
                Ok(())
            }
        }

        let mut fixed = FixedBuf {
            buf: [0; 8],
            len: 0,
        };
        write_formatted_time(&mut fixed, 125, DEFAULT_SEPARATOR).unwrap();
        assert_eq!(&fixed.buf[..fixed.len], b"2:05");
        let mut too_small = FixedBuf {
            buf: [0; 8],
            len: 6,
        };
        assert!(write_formatted_time(&mut too_small, 125, DEFAULT_SEPARATOR).is_err());
    }
}
