//! Play-by-play record structure.

/// One in-game event from the play-by-play log.
///
/// Events are ordered by elapsed time within each period. The running score
/// is forward-filled across rows that describe non-scoring events, so every
/// stored event carries the score as of that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayEvent {
    pub game_id: String,

    /// Period counter: 1-4 for regulation, 5+ for overtime
    pub quarter: i64,

    /// Clock remaining in the period, `M:SS.T`
    pub time: String,

    /// City name of the side the event belongs to
    pub city: String,

    /// Whether the event belongs to the home side
    pub is_home: bool,

    /// Running score as `away-home`
    pub score: String,

    /// Event description text
    pub event: String,

    /// Points the event scored; zero for non-scoring events
    pub points: i64,
}
