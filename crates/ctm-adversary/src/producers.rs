//! Scalar producers
//!
//! The note-valued producers return the note encoding (-1 or 1).

/// Value claimed by context flooding attacks
pub const FLOOD_VALUE: i64 = 50;

/// Ticks removed by the timestamp backdating attack
pub const BACKDATE_TICKS: i64 = 5;

/// Make the report worse than it should be
#[inline]
pub fn bad_mouth() -> i64 {
    -1
}

/// Make the report better than it should be
#[inline]
pub fn good_mouth() -> i64 {
    1
}

/// Bad mouth while `is_bad_mouthing`, good mouth otherwise
#[inline]
pub fn on_off(is_bad_mouthing: bool) -> i64 {
    if is_bad_mouthing {
        bad_mouth()
    } else {
        good_mouth()
    }
}

/// Always report the same service value
#[inline]
pub fn service_set() -> i64 {
    FLOOD_VALUE
}

/// Always report the same capability value
#[inline]
pub fn capability_set() -> i64 {
    FLOOD_VALUE
}

/// Claim the report is older than it really is
#[inline]
pub fn time_decay(time: i64) -> i64 {
    time - BACKDATE_TICKS
}
