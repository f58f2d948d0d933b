use cosmwasm_std::Timestamp;

pub const MINUTE: u64 = 60;
pub const HOUR: u64 = 60 * MINUTE;
pub const DAY: u64 = 24 * HOUR;

/// Longest lifetime or extension an instance may be configured with.
///
/// Block time plus the longest lifetime plus one extension stays far below `u64::MAX` nanoseconds.
pub const MAX_DURATION: u64 = 100 * 365 * DAY;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// No-commit window of a game without lifetime.
const BASE_WINDOW: u64 = 5 * MINUTE;
/// Upper bound of the lifetime dependent part of the window.
const SCALED_WINDOW_CAP: u64 = 16 * MINUTE;

/// Length of the window before the deadline in which a new commitment extends the game.
///
/// Grows with a quarter of the lifetime on top of five minutes, capped at 21 minutes overall,
/// and never longer than the lifetime itself.
pub fn no_commit_window(lifetime: u64) -> u64 {
    match lifetime {
        0 => BASE_WINDOW,
        _ => (BASE_WINDOW + (lifetime / 4).min(SCALED_WINDOW_CAP)).min(lifetime),
    }
}

/// Last moment at which a commitment does not push the deadline back.
pub fn last_commit_deadline(lifetime: u64, deadline: Timestamp) -> Timestamp {
    let window = no_commit_window(lifetime).saturating_mul(NANOS_PER_SECOND);
    Timestamp::from_nanos(deadline.nanos().saturating_sub(window))
}

/// Deadline after an enrolment at `enrolled_at`.
///
/// Commitments landing after `last_commit_deadline` grant `post_commit_window` more seconds, so
/// the late player still gets a full reveal phase. The deadline is never shortened.
pub fn maybe_extend(
    deadline: Timestamp,
    last_commit_deadline: Timestamp,
    enrolled_at: Timestamp,
    post_commit_window: u64,
) -> Timestamp {
    if enrolled_at > last_commit_deadline {
        deadline.plus_seconds(post_commit_window)
    } else {
        deadline
    }
}
