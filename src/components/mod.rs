pub mod fixtures;
pub mod leaders;
pub mod lineup;
pub mod match_stats;
pub mod squad;
pub mod standings;
pub mod team_stats;
