/// Points awarded for a correct guess, decreasing with every wrong attempt before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringPolicy {
    pub base: u32,
    pub penalty: u32,
    pub floor: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            base: 100,
            penalty: 10,
            floor: 10,
        }
    }
}

impl ScoringPolicy {
    /// `max(base - attempts * penalty, floor)`, saturating instead of overflowing
    pub fn points(&self, attempts: u32) -> u32 {
        self.base
            .saturating_sub(attempts.saturating_mul(self.penalty))
            .max(self.floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_formula() {
        let policy = ScoringPolicy::default();

        for attempts in 0..30u32 {
            let expected = (100i64 - 10 * attempts as i64).max(10) as u32;
            assert_eq!(policy.points(attempts), expected);
        }
    }

    #[test]
    fn points_never_increase_with_attempts() {
        let policy = ScoringPolicy::default();
        let mut previous = policy.points(0);

        for attempts in 1..50 {
            let current = policy.points(attempts);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn huge_attempt_counts_hit_the_floor() {
        assert_eq!(ScoringPolicy::default().points(u32::MAX), 10);
    }
}
