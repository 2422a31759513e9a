use chrono::{NaiveDateTime, Utc};

/// Source of the current time for time-sensitive validation rules.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// The system wall clock, in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> NaiveDateTime,
{
    fn now(&self) -> NaiveDateTime {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn noon(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 3, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(noon(10));
        assert_eq!(clock.now(), noon(10));
        assert_eq!(clock.now(), noon(10));
    }

    #[test]
    fn test_closure_clock_can_step() {
        let day = Cell::new(10);
        let clock = || {
            let current = day.get();
            day.set(current + 1);
            noon(current)
        };
        assert_eq!(clock.now(), noon(10));
        assert_eq!(clock.now(), noon(11));
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let first = SystemClock.now();
        assert!(SystemClock.now() >= first);
    }
}
