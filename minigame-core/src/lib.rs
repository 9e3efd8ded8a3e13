use minigame_database::{CooldownGate, Database};

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub gift_cooldown: CooldownGate,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
