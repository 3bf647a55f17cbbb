/// Feedback for a wrong guess, ordered from the highest lower bound down.
/// A similarity strictly above a bound selects its message, first match wins.
const FEEDBACK_TIERS: [(f64, &str); 4] = [
    (0.75, "🔥 Very close!"),
    (0.6, "👍 Getting warmer!"),
    (0.4, "🤔 On the right track..."),
    (0.2, "❄️ Cold..."),
];

const COLDEST_FEEDBACK: &str = "🌨️ Very cold!";

pub fn feedback_for(similarity: f64) -> &'static str {
    FEEDBACK_TIERS
        .iter()
        .find(|(lower_bound, _)| similarity > *lower_bound)
        .map(|(_, message)| *message)
        .unwrap_or(COLDEST_FEEDBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_tier_above_bound() {
        assert_eq!(feedback_for(0.9), "🔥 Very close!");
        assert_eq!(feedback_for(0.7), "👍 Getting warmer!");
        assert_eq!(feedback_for(0.5), "🤔 On the right track...");
        assert_eq!(feedback_for(0.3), "❄️ Cold...");
        assert_eq!(feedback_for(0.1), "🌨️ Very cold!");
    }

    #[test]
    fn bounds_are_exclusive() {
        assert_eq!(feedback_for(0.75), "👍 Getting warmer!");
        assert_eq!(feedback_for(0.2), "🌨️ Very cold!");
        assert_eq!(feedback_for(0.0), "🌨️ Very cold!");
    }
}
