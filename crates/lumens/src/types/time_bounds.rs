//! Transaction validity windows.

use std::{
    io::{Read, Write},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use lumens_core::ser::{read_u64, write_u64, ByteFormat, SerError, SerResult};

/// A point in time, in seconds since the UNIX epoch. Zero means "unrestricted" when used as a
/// time bound.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimePoint(pub u64);

impl TimePoint {
    /// The epoch seconds.
    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TimePoint {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

impl From<Duration> for TimePoint {
    fn from(since_epoch: Duration) -> Self {
        Self(since_epoch.as_secs())
    }
}

impl From<SystemTime> for TimePoint {
    /// Times before the epoch saturate to 0.
    fn from(time: SystemTime) -> Self {
        time.duration_since(UNIX_EPOCH)
            .map(Self::from)
            .unwrap_or_default()
    }
}

/// A closed validity window `[min_time, max_time]`. A bound of 0 leaves that side open.
///
/// No ordering between the bounds is enforced. A window with `min_time > max_time` encodes
/// normally and the network rejects the transaction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct TimeBounds {
    /// Earliest acceptance time
    pub min_time: TimePoint,
    /// Latest acceptance time
    pub max_time: TimePoint,
}

impl TimeBounds {
    /// Instantiate a window.
    pub fn new(min_time: impl Into<TimePoint>, max_time: impl Into<TimePoint>) -> Self {
        Self {
            min_time: min_time.into(),
            max_time: max_time.into(),
        }
    }

    /// A present window with both sides open.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// True if both sides are set and the minimum is after the maximum.
    pub fn is_inverted(&self) -> bool {
        self.max_time.0 != 0 && self.min_time > self.max_time
    }
}

impl ByteFormat for TimeBounds {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        16
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        Ok(Self {
            min_time: TimePoint(read_u64(reader)?),
            max_time: TimePoint(read_u64(reader)?),
        })
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        let mut len = write_u64(writer, self.min_time.0)?;
        len += write_u64(writer, self.max_time.0)?;
        Ok(len)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_converts_system_times() {
        let time = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        assert_eq!(TimePoint::from(time), TimePoint(1_600_000_000));
        assert_eq!(
            TimePoint::from(UNIX_EPOCH - Duration::from_secs(5)),
            TimePoint(0)
        );
    }

    #[test]
    fn it_encodes_present_and_absent_bounds() {
        let bounds = TimeBounds::new(1u64, 0x0102u64);
        assert_eq!(
            bounds.serialize_hex().unwrap(),
            "00000000000000010000000000000102"
        );
        assert_eq!(
            Some(bounds).to_bytes().unwrap().len(),
            20
        );
        assert_eq!(None::<TimeBounds>.to_bytes().unwrap(), vec![0, 0, 0, 0]);
        // present but unrestricted is not the same document as absent
        assert_eq!(
            Some(TimeBounds::unbounded()).to_bytes().unwrap(),
            [vec![0, 0, 0, 1], vec![0u8; 16]].concat()
        );
    }

    #[test]
    fn it_detects_inverted_windows() {
        assert!(TimeBounds::new(10u64, 5u64).is_inverted());
        assert!(!TimeBounds::new(5u64, 10u64).is_inverted());
        assert!(!TimeBounds::new(10u64, 0u64).is_inverted());
    }
}
