use chrono::{DateTime, FixedOffset, TimeDelta};
use std::mem::replace;

/// An hour range iterator that yields each whole hour from the start
/// through the end (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct HourRange(pub DateTime<FixedOffset>, pub DateTime<FixedOffset>);

impl Iterator for HourRange {
    type Item = DateTime<FixedOffset>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + TimeDelta::hours(1);
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}
