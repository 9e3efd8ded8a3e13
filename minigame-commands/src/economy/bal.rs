use minigame_core::{Context, Error};
use minigame_database::impls::ledger::{get_coin_balance, record_command};
use minigame_utils::embed::build_embed;
use minigame_utils::formatting::format_coins;

use crate::CommandMeta;
use crate::economy::ledger_identity;

pub const META: CommandMeta = CommandMeta {
    name: "bal",
    desc: "Tells you your coin balance.",
    category: "stats",
    usage: "mini bal",
};

#[poise::command(prefix_command, slash_command, category = "Stats")]
pub async fn bal(ctx: Context<'_>) -> Result<(), Error> {
    let db = &ctx.data().db;
    let author = ctx.author();
    let identity = ledger_identity(author);

    record_command(db, &identity).await?;
    let balance = get_coin_balance(db, &identity).await?;

    let embed = build_embed(
        format!("💸 {}'s Bank Account", author.name),
        format!("<@{}> - Earn more coins by playing mini games!", author.id),
    )
    .field("Your balance:", format_coins(balance), false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
