//! Session configuration, fixed for the lifetime of a session.
use crate::error::ConfigError;
use clap::Args;

/// Largest palette that still maps every color to a letter `A..=Z`.
pub const MAX_COLORS: u8 = 26;

/// Rules and sizes for one puzzle session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    /// Minimum run length that clears.
    pub match_color_count: usize,
    pub base_score_per_tile: u32,
    /// Session length in seconds.
    pub session_duration: f32,
    /// Spawned tiles draw their color from `0..color_count`.
    pub color_count: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            width: 6,
            height: 6,
            match_color_count: 3,
            base_score_per_tile: 100,
            session_duration: 60.0,
            color_count: 5,
        }
    }
}

impl SessionConfig {
    /// Rejects configurations that cannot produce a playable board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        if self.match_color_count < 2 {
            return Err(ConfigError::MatchCountTooSmall(self.match_color_count));
        }
        if self.color_count == 0 {
            return Err(ConfigError::NoColors(self.color_count));
        }
        if self.color_count > MAX_COLORS {
            return Err(ConfigError::TooManyColors {
                found: self.color_count,
                max: MAX_COLORS,
            });
        }
        Ok(())
    }
}

/// Command-line flags shared by the binaries, flattened into their `Args`.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Board width in cells
    #[arg(long, default_value_t = 6)]
    pub width: usize,

    /// Board height in cells
    #[arg(long, default_value_t = 6)]
    pub height: usize,

    /// Minimum run length that clears
    #[arg(long, default_value_t = 3)]
    pub match_count: usize,

    /// Points per cleared tile (and per combo step)
    #[arg(long, default_value_t = 100)]
    pub score_per_tile: u32,

    /// Session length in seconds
    #[arg(long, default_value_t = 60.0)]
    pub duration: f32,

    /// Number of tile colors
    #[arg(long, default_value_t = 5)]
    pub colors: u8,
}

impl From<SessionArgs> for SessionConfig {
    fn from(args: SessionArgs) -> Self {
        SessionConfig {
            width: args.width,
            height: args.height,
            match_color_count: args.match_count,
            base_score_per_tile: args.score_per_tile,
            session_duration: args.duration,
            color_count: args.colors,
        }
    }
}
