mod birthday_preferences;
mod handicap;
mod major_template;
mod player;
mod score_record;
mod tournament;
mod tournament_participant;

pub use birthday_preferences::BirthdayPreferences;
pub use handicap::HandicapRecord;
pub use major_template::MajorTemplate;
pub use player::Player;
pub use score_record::ScoreRecord;
pub use tournament::{NewTournament, Tournament, TournamentType};
pub use tournament_participant::TournamentParticipant;
