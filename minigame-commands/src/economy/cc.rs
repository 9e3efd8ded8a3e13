use minigame_core::{Context, Error};
use minigame_database::impls::ledger::{get_command_count, record_command};
use minigame_utils::embed::build_embed;

use crate::CommandMeta;
use crate::economy::ledger_identity;

pub const META: CommandMeta = CommandMeta {
    name: "cc",
    desc: "How many commands have you sent?",
    category: "stats",
    usage: "mini cc",
};

#[poise::command(prefix_command, slash_command, category = "Stats")]
pub async fn cc(ctx: Context<'_>) -> Result<(), Error> {
    let db = &ctx.data().db;
    let identity = ledger_identity(ctx.author());

    record_command(db, &identity).await?;
    let count = get_command_count(db, &identity).await?;

    let embed = build_embed(
        format!("💻 {}'s command count", ctx.author().name),
        format!("You have sent me {count} commands!"),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
