/// Round a remaining cooldown to the nearest whole minute.
pub fn cooldown_minutes(remaining_secs: u64) -> u64 {
    remaining_secs.saturating_add(30) / 60
}

/// Human-readable "try again" wait (e.g. "1 minute", "59 minutes").
pub fn format_cooldown_wait(remaining_secs: u64) -> String {
    match cooldown_minutes(remaining_secs) {
        0 => "less than a minute".to_owned(),
        1 => "1 minute".to_owned(),
        minutes => format!("{minutes} minutes"),
    }
}

/// Format a coin amount with the coin emoji suffix.
pub fn format_coins(amount: u64) -> String {
    format!("{amount} 🪙")
}
