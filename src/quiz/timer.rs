use std::time::{Duration, Instant};

pub const DEFAULT_DURATION_SECS: u32 = 30;

const UNIT: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running { question: usize, remaining: u32 },
    Expired { question: usize },
}

/// Per-question countdown. Re-armed explicitly whenever a new question
/// becomes current; fires its expiry callback at most once per arming.
#[derive(Clone, Debug)]
pub struct Countdown {
    duration: u32,
    state: CountdownState,
    /// Wall-clock instant of the last whole unit consumed by `poll`.
    last_unit_at: Option<Instant>,
}

impl Countdown {
    pub fn new(duration: u32) -> Self {
        Self {
            duration: duration.max(1),
            state: CountdownState::Idle,
            last_unit_at: None,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Reset to the full duration for `question`, whatever the prior state.
    pub fn arm(&mut self, question: usize, now: Instant) {
        self.state = CountdownState::Running {
            question,
            remaining: self.duration,
        };
        self.last_unit_at = Some(now);
    }

    /// Drop the running countdown without firing.
    pub fn cancel(&mut self) {
        self.state = CountdownState::Idle;
        self.last_unit_at = None;
    }

    pub fn remaining(&self) -> u32 {
        match self.state {
            CountdownState::Running { remaining, .. } => remaining,
            CountdownState::Idle => self.duration,
            CountdownState::Expired { .. } => 0,
        }
    }

    /// Fraction of time left, for the timer bar.
    pub fn ratio(&self) -> f64 {
        self.remaining() as f64 / self.duration as f64
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, CountdownState::Running { .. })
    }

    /// Consume one unit. On reaching zero, transition to Expired and call
    /// `on_expire` with the armed question index.
    pub fn tick(&mut self, on_expire: impl FnOnce(usize)) {
        if let CountdownState::Running { question, remaining } = self.state {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                self.state = CountdownState::Expired { question };
                self.last_unit_at = None;
                on_expire(question);
            } else {
                self.state = CountdownState::Running { question, remaining };
            }
        }
    }

    /// Convert elapsed wall-clock time into whole-unit ticks. Partial units
    /// carry over to the next poll.
    pub fn poll(&mut self, now: Instant, on_expire: impl FnOnce(usize)) {
        let mut on_expire = Some(on_expire);
        while let Some(last) = self.last_unit_at {
            if now.saturating_duration_since(last) < UNIT {
                break;
            }
            self.last_unit_at = Some(last + UNIT);
            self.tick(|question| {
                if let Some(f) = on_expire.take() {
                    f(question);
                }
            });
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle_and_ticks_do_nothing() {
        let mut cd = Countdown::new(3);
        assert_eq!(cd.state(), CountdownState::Idle);
        let mut fired = false;
        cd.tick(|_| fired = true);
        assert!(!fired);
        assert_eq!(cd.state(), CountdownState::Idle);
    }

    #[test]
    fn test_expires_exactly_once_after_full_duration() {
        let mut cd = Countdown::new(30);
        cd.arm(4, Instant::now());
        let mut fired = Vec::new();
        for _ in 0..29 {
            cd.tick(|q| fired.push(q));
        }
        assert!(fired.is_empty());
        assert_eq!(cd.remaining(), 1);
        cd.tick(|q| fired.push(q));
        assert_eq!(fired, vec![4]);
        assert_eq!(cd.state(), CountdownState::Expired { question: 4 });
        for _ in 0..5 {
            cd.tick(|q| fired.push(q));
        }
        assert_eq!(fired, vec![4]);
    }

    #[test]
    fn test_rearm_resets_full_duration() {
        let t0 = Instant::now();
        let mut cd = Countdown::new(10);
        cd.arm(0, t0);
        cd.tick(|_| {});
        cd.tick(|_| {});
        assert_eq!(cd.remaining(), 8);
        cd.arm(1, t0);
        assert_eq!(
            cd.state(),
            CountdownState::Running { question: 1, remaining: 10 }
        );
    }

    #[test]
    fn test_rearm_after_expiry_runs_again() {
        let mut cd = Countdown::new(1);
        cd.arm(0, Instant::now());
        let mut fired = 0;
        cd.tick(|_| fired += 1);
        cd.arm(1, Instant::now());
        assert!(cd.is_running());
        cd.tick(|_| fired += 1);
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_cancel_suppresses_callback() {
        let mut cd = Countdown::new(2);
        cd.arm(0, Instant::now());
        cd.tick(|_| {});
        cd.cancel();
        let mut fired = false;
        cd.tick(|_| fired = true);
        cd.tick(|_| fired = true);
        assert!(!fired);
        assert_eq!(cd.state(), CountdownState::Idle);
    }

    #[test]
    fn test_poll_counts_whole_seconds_only() {
        let t0 = Instant::now();
        let mut cd = Countdown::new(30);
        cd.arm(0, t0);
        cd.poll(t0 + Duration::from_millis(900), |_| {});
        assert_eq!(cd.remaining(), 30);
        cd.poll(t0 + Duration::from_millis(1100), |_| {});
        assert_eq!(cd.remaining(), 29);
        cd.poll(t0 + Duration::from_millis(1900), |_| {});
        assert_eq!(cd.remaining(), 29);
        cd.poll(t0 + Duration::from_millis(3000), |_| {});
        assert_eq!(cd.remaining(), 27);
    }

    #[test]
    fn test_poll_fires_once_at_thirty_seconds() {
        let t0 = Instant::now();
        let mut cd = Countdown::new(30);
        cd.arm(2, t0);
        let mut fired = Vec::new();
        cd.poll(t0 + Duration::from_secs(29), |q| fired.push(q));
        assert!(fired.is_empty());
        cd.poll(t0 + Duration::from_secs(30), |q| fired.push(q));
        assert_eq!(fired, vec![2]);
        // A late poll far past the deadline does not fire again.
        cd.poll(t0 + Duration::from_secs(90), |q| fired.push(q));
        assert_eq!(fired, vec![2]);
    }

    #[test]
    fn test_ratio() {
        let mut cd = Countdown::new(4);
        cd.arm(0, Instant::now());
        cd.tick(|_| {});
        assert!((cd.ratio() - 0.75).abs() < f64::EPSILON);
    }
}
