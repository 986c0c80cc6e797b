// ESPN season snapshot boundary: payload parsing and position sanitization.

pub mod payload;
pub mod sanitize;

pub use payload::{
    LeagueSettings, MatchupSide, PayloadError, RawBoxscore, RawBoxscorePlayer, SeasonSnapshot,
    TeamId, TeamInfo,
};
pub use sanitize::PositionCorrections;
