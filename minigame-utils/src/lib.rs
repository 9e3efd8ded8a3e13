/// Generic embed builders shared across commands.
pub mod embed;
/// Shared formatting helpers (cooldowns, coin amounts).
pub mod formatting;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: &str = "mini ";
/// Shared time helpers.
pub mod time;
