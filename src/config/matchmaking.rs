//! Matchmaking configuration constants.
//!
//! This module defines seat limits and turn limits for matches.

/// Maximum number of players seated in a match.
pub const MAX_SEATS: usize = 4;

/// Minimum number of players required before the owner may start a match.
pub const MIN_PLAYERS: usize = 2;

/// Upper bound accepted for a match's turn limit (rounds).
pub const MAX_TURN_LIMIT: u32 = 200;

/// Turn limit suggested to clients creating a match.
pub const DEFAULT_TURN_LIMIT: u32 = 10;
