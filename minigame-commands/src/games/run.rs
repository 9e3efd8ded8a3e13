use minigame_core::{Context, Error};
use minigame_database::impls::ledger::record_command;
use minigame_utils::embed::under_construction_embed;

use crate::CommandMeta;
use crate::economy::ledger_identity;

pub const META: CommandMeta = CommandMeta {
    name: "run",
    desc: "The Endless Runner game.",
    category: "games",
    usage: "mini run",
};

#[poise::command(prefix_command, slash_command, category = "Games")]
pub async fn run(ctx: Context<'_>) -> Result<(), Error> {
    record_command(&ctx.data().db, &ledger_identity(ctx.author())).await?;

    ctx.send(poise::CreateReply::default().embed(under_construction_embed()))
        .await?;
    Ok(())
}
