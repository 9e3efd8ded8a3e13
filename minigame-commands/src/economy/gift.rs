use minigame_core::{Context, Error};
use minigame_database::CooldownCheck;
use minigame_database::impls::ledger::record_command;
use minigame_database::impls::reward::grant_mystery_reward;
use minigame_utils::time::now_unix_secs;

use crate::CommandMeta;
use crate::economy::embeds::{cooldown_embed, mystery_box_embed};
use crate::economy::ledger_identity;

pub const META: CommandMeta = CommandMeta {
    name: "gift",
    desc: "What prize can you win? Once per hour.",
    category: "stats",
    usage: "mini gift",
};

#[poise::command(prefix_command, slash_command, category = "Stats")]
pub async fn gift(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let identity = ledger_identity(ctx.author());

    if let CooldownCheck::Active { remaining_secs } = data
        .gift_cooldown
        .try_acquire(&identity, now_unix_secs())
        .await
    {
        ctx.send(poise::CreateReply::default().embed(cooldown_embed(remaining_secs)))
            .await?;
        return Ok(());
    }

    let granted = async {
        record_command(&data.db, &identity).await?;
        grant_mystery_reward(&data.db, &identity).await
    }
    .await;

    let reward = match granted {
        Ok(reward) => reward,
        Err(error) => {
            // A failed grant must not cost the user their hourly box.
            data.gift_cooldown.release(&identity).await;
            return Err(error);
        }
    };

    let Some(reward) = reward else {
        return Ok(());
    };

    ctx.send(poise::CreateReply::default().embed(mystery_box_embed(ctx.author().id.get(), &reward)))
        .await?;
    Ok(())
}
