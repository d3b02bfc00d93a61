//! Substitution-interval record structure.

/// One on-court stint for a (game, player).
///
/// The source renders each player's game as a strip of width-proportional
/// segments; rescaling the widths to the 48-minute clock yields fractional
/// sub-in/sub-out boundaries. A player's intervals partition the game clock
/// without gaps. Segments still open (no recorded point total) are dropped
/// before this record is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionInterval {
    pub game_id: String,

    /// Player name with diacritics stripped
    pub player: String,

    /// Minute mark the player entered, fractional
    pub subin_minute: f64,

    /// Minute mark the player left, fractional
    pub subout_minute: f64,

    /// Net point differential while on court
    pub plus_minus: i64,
}

impl SubstitutionInterval {
    /// Stint length in fractional minutes.
    pub fn duration(&self) -> f64 {
        self.subout_minute - self.subin_minute
    }
}
