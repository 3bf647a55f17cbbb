/// Case-folds and trims a guess or a secret word so both sides compare the same way
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Closeness of two already normalized strings, bounded to [0, 1].
///
/// Sørensen–Dice coefficient over character bigrams, whitespace ignored.
/// Equal strings always score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(a, b).clamp(0.0, 1.0)
}
