use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Wall clock in a fixed zone, rendered as the ticker's header sentence.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    zone: Tz,
}

impl Clock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn format_now(&self) -> String {
        self.format_at(Utc::now())
    }

    pub fn format_at(&self, instant: DateTime<Utc>) -> String {
        let local = instant.with_timezone(&self.zone);
        format!("Il est {}", local.format("%I:%M:%S %p %Z on %b %d, %Y"))
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_winter_time() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 13, 23, 5, 9).unwrap();
        assert_eq!(
            Clock::default().format_at(instant),
            "Il est 06:05:09 PM EST on Jan 13, 2024"
        );
    }

    #[test]
    fn formats_summer_time() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap();
        assert_eq!(
            Clock::default().format_at(instant),
            "Il est 10:00:00 AM EDT on Jun 01, 2024"
        );
    }

    #[test]
    fn honours_configured_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 13, 23, 5, 9).unwrap();
        let clock = Clock::new(chrono_tz::America::Los_Angeles);
        assert_eq!(clock.format_at(instant), "Il est 03:05:09 PM PST on Jan 13, 2024");
    }
}
