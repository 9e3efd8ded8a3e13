pub mod economy;
pub mod games;
pub mod utility;

use minigame_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    economy::cc::META,
    economy::bal::META,
    economy::lead::META,
    economy::gift::META,
    games::run::META,
    games::bj::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::help::help(),
        economy::cc::cc(),
        economy::bal::bal(),
        economy::lead::lead(),
        economy::gift::gift(),
        games::run::run(),
        games::bj::bj(),
    ]
}
