pub mod list;
pub mod record;
pub mod start;
pub mod stats;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Universe Signs Bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Register and show the welcome message")]
    Start,
    #[command(description = "Record a time sign")]
    Time,
    #[command(description = "Record a number sign")]
    Numbers,
    #[command(description = "Show statistics of all time")]
    Stat,
    #[command(rename = "stat_range", description = "Show statistics for a period")]
    StatRange,
    #[command(description = "List every sign with its meaning")]
    List,
    #[command(description = "Abandon the current statistics request")]
    Cancel,
}
