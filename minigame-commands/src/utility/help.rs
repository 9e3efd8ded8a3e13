use minigame_core::{Context, Error};
use minigame_database::impls::ledger::record_command;
use minigame_utils::embed::build_embed;

use crate::economy::ledger_identity;
use crate::utility::embeds::{grouped_help_description, unknown_category_message};
use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "A complete list of our features.",
    category: "utility",
    usage: "mini help [category]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Only show one category"] category: Option<String>,
) -> Result<(), Error> {
    record_command(&ctx.data().db, &ledger_identity(ctx.author())).await?;

    let category = category
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(str::to_ascii_lowercase);

    let categories: Vec<&str> = known_categories();
    if let Some(wanted) = category.as_deref()
        && !categories.contains(&wanted)
    {
        ctx.say(unknown_category_message(wanted, &categories)).await?;
        return Ok(());
    }

    let commands = sorted_commands(category.as_deref());
    let embed = build_embed(
        "🎯 MinigameBot Command Guide",
        grouped_help_description(&commands),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Categories in the order they first appear in the catalogue.
fn known_categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = Vec::new();
    for command in COMMANDS {
        if !categories.contains(&command.category) {
            categories.push(command.category);
        }
    }
    categories
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let categories = known_categories();
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| match category {
            Some(wanted) => cmd.category == wanted,
            None => true,
        })
        .collect();

    // Group by category, keeping catalogue order inside each group.
    filtered.sort_by_key(|cmd| {
        categories
            .iter()
            .position(|known| *known == cmd.category)
            .unwrap_or(usize::MAX)
    });
    filtered
}
