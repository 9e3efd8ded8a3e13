use std::env;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use minigame_core::{Data, Error};
use minigame_database::cache::DEFAULT_LEADERBOARD_CACHE_TTL;
use minigame_database::cooldown::{DEFAULT_GIFT_COOLDOWN, RewardKind};
use minigame_database::{CacheService, CooldownGate, Database, LedgerStore, MIGRATOR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let guild_id = parse_guild_id(env_non_empty("DISCORD_GUILD_ID").as_deref())?;

    let ledger = match env_non_empty("DATABASE_URL") {
        Some(database_url) => {
            let db_pool = PgPoolOptions::new()
                .max_connections(env_u32("DATABASE_MAX_CONNECTIONS", 5))
                .connect(&database_url)
                .await?;
            info!("PostgreSQL connection established.");

            if env_bool("AUTO_RUN_MIGRATIONS", true) {
                MIGRATOR.run(&db_pool).await?;
                info!("Database migrations applied.");
            } else {
                info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
            }

            LedgerStore::postgres(db_pool)
        }
        None => {
            warn!("DATABASE_URL is missing; balances are kept in memory and lost on restart.");
            LedgerStore::memory()
        }
    };

    let redis_enabled = env_bool("REDIS_ENABLED", false);
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "minigame:prod".to_string());

    let mut cache = if redis_enabled {
        match env::var("REDIS_URL") {
            Ok(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
                Ok(cache) => {
                    info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                    cache
                }
                Err(err) => {
                    warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing without it.");
                    CacheService::disabled(redis_key_prefix.clone())
                }
            },
            Err(_) => {
                warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing without it.");
                CacheService::disabled(redis_key_prefix.clone())
            }
        }
    } else {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        CacheService::disabled(redis_key_prefix.clone())
    };

    cache.configure_leaderboard_ttl(Duration::from_secs(env_u64(
        "LEADERBOARD_CACHE_TTL_SECONDS",
        DEFAULT_LEADERBOARD_CACHE_TTL.as_secs(),
    )));

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    let gift_cooldown = CooldownGate::new(
        RewardKind::MysteryBox,
        Duration::from_secs(env_u64(
            "GIFT_COOLDOWN_SECONDS",
            DEFAULT_GIFT_COOLDOWN.as_secs(),
        )),
        cache.clone(),
    );
    info!(
        gift_cooldown_seconds = gift_cooldown.window().as_secs(),
        leaderboard_cache_ttl_seconds = cache.leaderboard_ttl().as_secs(),
        "Rewards configured."
    );

    let db = Database::with_cache(ledger, cache);

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework_db = db.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: minigame_commands::commands(),
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(minigame_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            let db = framework_db.clone();
            let gift_cooldown = gift_cooldown.clone();
            Box::pin(async move {
                info!(user = %ready.user.name, "MinigameBot has logged in!");

                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?
                    }
                }

                Ok(Data { db, gift_cooldown })
            })
        })
        .build();

    info!("MinigameBot is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested; stopping shards.");
            shard_manager.shutdown_all().await;
        }
    });

    let outcome = client.start().await;
    db.close().await;
    info!("MinigameBot has stopped.");

    outcome?;
    Ok(())
}

/// Read `key`, treating an empty or blank value the same as an unset one.
fn env_non_empty(key: &str) -> Option<String> {
    non_empty(env::var(key).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

fn parse_guild_id(raw: Option<&str>) -> anyhow::Result<Option<u64>> {
    raw.map(|raw| {
        raw.parse::<u64>()
            .map_err(|e| anyhow::anyhow!("DISCORD_GUILD_ID `{raw}` is not a guild id: {e}"))
    })
    .transpose()
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u32>().unwrap_or(default),
        Err(_) => default,
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command. Please try again later.")
                .color(minigame_utils::embed::DEFAULT_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!(
                "Usage: `{}{}`",
                minigame_utils::COMMAND_PREFIX,
                ctx.command().qualified_name
            );
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}
