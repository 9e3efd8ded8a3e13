use std::collections::HashMap;

use minigame_database::impls::reward::MysteryReward;
use minigame_database::model::leaderboard::{RankMarker, Ranking};
use minigame_utils::COMMAND_PREFIX;
use minigame_utils::embed::build_embed;
use minigame_utils::formatting::{format_coins, format_cooldown_wait};
use poise::serenity_prelude as serenity;

pub fn rank_marker_emoji(marker: RankMarker) -> &'static str {
    match marker {
        RankMarker::First => "🥇",
        RankMarker::Second => "🥈",
        RankMarker::Third => "🥉",
        RankMarker::Listed => "💐",
    }
}

/// Body of the leaderboard embed, one line per ranked member.
pub fn leaderboard_description(
    ranking: &Ranking,
    guild_name: &str,
    names: &HashMap<u64, String>,
) -> String {
    match ranking {
        Ranking::NoActiveMembers => format!(
            "There are no active members in {}. Run `{}help` to earn coins!",
            guild_name, COMMAND_PREFIX
        ),
        Ranking::Ranked(entries) => entries
            .iter()
            .map(|entry| {
                let name = names
                    .get(&entry.user_id)
                    .cloned()
                    .unwrap_or_else(|| format!("<@{}>", entry.user_id));
                format!(
                    "{} **{}** - {}",
                    rank_marker_emoji(entry.marker),
                    entry.coins,
                    name
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn mystery_box_embed(user_id: u64, reward: &MysteryReward) -> serenity::CreateEmbed {
    build_embed(
        "🎁 Opening mystery box... 🎁",
        format!(
            "<@{}> your gift is: {}!",
            user_id,
            format_coins(reward.amount)
        ),
    )
    .field("Your new balance:", format_coins(reward.new_balance), false)
}

pub fn cooldown_embed(remaining_secs: u64) -> serenity::CreateEmbed {
    build_embed(
        "🧊 Cooldown!",
        format!("Try again in {}.", format_cooldown_wait(remaining_secs)),
    )
}
