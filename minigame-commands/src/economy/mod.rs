pub mod bal;
pub mod cc;
pub mod embeds;
pub mod gift;
pub mod lead;

use minigame_database::UserIdentity;
use poise::serenity_prelude as serenity;

/// Ledger identity for a platform user.
pub fn ledger_identity(user: &serenity::User) -> UserIdentity {
    UserIdentity::new(user.id.get(), user.bot)
}
