pub mod handicap;
pub mod leaderboard;
pub mod scoring;
pub mod tournament_leaderboard;
pub mod tournament_schedule;
