use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x6A_0D_FF;

/// Build a standard embed with consistent styling.
pub fn build_embed(title: impl Into<String>, description: impl Into<String>) -> serenity::CreateEmbed {
    let description = description.into();
    let builder = serenity::CreateEmbed::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR);

    if description.is_empty() {
        builder
    } else {
        builder.description(description)
    }
}

/// Embed shown by commands that are not playable yet.
pub fn under_construction_embed() -> serenity::CreateEmbed {
    build_embed(
        "🚧 This command is under construction... 🚧",
        "Come back soon :)",
    )
}
