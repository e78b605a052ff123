//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and internal
//! square indices reused by FEN, move text, and the message protocol.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{file_of, rank_of, Square};

/// Convert algebraic notation (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidSquare(square.to_owned()));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Convert a square index (`0..=63`) to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let file_char = char::from(b'a' + file_of(square));
    let rank_char = char::from(b'1' + rank_of(square));
    format!("{file_char}{rank_char}")
}

/// Serde adapter so squares travel as `"e4"` rather than raw indices.
pub mod serde_square {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::{algebraic_to_square, square_to_algebraic};
    use crate::game_state::chess_types::Square;

    pub fn serialize<S: Serializer>(square: &Square, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&square_to_algebraic(*square))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Square, D::Error> {
        let text = String::deserialize(deserializer)?;
        algebraic_to_square(&text).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, square_to_algebraic};
    use crate::errors::ChessError;

    #[test]
    fn round_trip_square_conversions() {
        assert_eq!(algebraic_to_square("a1").expect("a1 should parse"), 0);
        assert_eq!(algebraic_to_square("h8").expect("h8 should parse"), 63);
        assert_eq!(square_to_algebraic(0), "a1");
        assert_eq!(square_to_algebraic(28), "e4");
        assert_eq!(square_to_algebraic(63), "h8");
    }

    #[test]
    fn rejects_out_of_range_text() {
        assert_eq!(
            algebraic_to_square("i9"),
            Err(ChessError::InvalidSquare("i9".to_owned()))
        );
        assert!(algebraic_to_square("e").is_err());
        assert!(algebraic_to_square("e44").is_err());
    }
}
