use std::collections::HashMap;

use minigame_core::{Context, Error};
use minigame_database::impls::leaderboard::rank_members_cached;
use minigame_database::impls::ledger::record_command;
use minigame_utils::embed::build_embed;
use tracing::debug;

use crate::CommandMeta;
use crate::economy::embeds::leaderboard_description;
use crate::economy::ledger_identity;

pub const META: CommandMeta = CommandMeta {
    name: "lead",
    desc: "See the top 10 richest users!",
    category: "stats",
    usage: "mini lead",
};

#[poise::command(prefix_command, slash_command, category = "Stats")]
pub async fn lead(ctx: Context<'_>) -> Result<(), Error> {
    let db = &ctx.data().db;
    record_command(db, &ledger_identity(ctx.author())).await?;

    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("The leaderboard is only available inside a server.")
            .await?;
        return Ok(());
    };

    // Copy what we need out of the cache guard before awaiting.
    let snapshot = ctx.guild().map(|guild| {
        let mut members = Vec::with_capacity(guild.members.len());
        let mut names = HashMap::with_capacity(guild.members.len());
        for member in guild.members.values() {
            members.push(ledger_identity(&member.user));
            names.insert(member.user.id.get(), member.display_name().to_owned());
        }
        (guild.name.clone(), members, names)
    });

    let Some((guild_name, members, names)) = snapshot else {
        ctx.say("This server is not cached yet, try again in a moment.")
            .await?;
        return Ok(());
    };

    debug!(guild_id = guild_id.get(), members = members.len(), "ranking guild members");
    let ranking = rank_members_cached(db, guild_id.get(), &members).await?;

    let embed = build_embed(
        format!("🏆 {guild_name}'s Coin Leaderboard 🏆"),
        leaderboard_description(&ranking, &guild_name, &names),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
