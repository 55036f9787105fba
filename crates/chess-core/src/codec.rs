//! Fixed-width move codes and the sequence keys built from them.
//!
//! A move without promotion is stored as `[from, to]`. A promotion adds 64 to
//! the first byte and packs the piece into the top two bits of the second:
//! `[from + 64, to + 64 * (rank - 2)]` with Knight=2, Bishop=3, Rook=4, Queen=5.
//!
//! Every code is exactly two bytes wide, so one move list is a prefix of
//! another exactly when its key is a byte prefix of the other's key.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use shakmaty::{uci::UciMove, Role, Square};

use crate::error::CatalogError;

/// Added to the first byte of a promotion code.
const PROMOTION_FLAG: u8 = 64;

/// Indexed by `second_byte / 64`.
const PROMOTIONS: [Promotion; 4] = [
    Promotion::Knight,
    Promotion::Bishop,
    Promotion::Rook,
    Promotion::Queen,
];

/// Two bytes encoding one [`Move`].
pub type MoveCode = [u8; 2];

/// Piece a pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl Promotion {
    /// Rank used by the code layout (Knight=2 .. Queen=5).
    pub const fn rank(self) -> u8 {
        match self {
            Promotion::Knight => 2,
            Promotion::Bishop => 3,
            Promotion::Rook => 4,
            Promotion::Queen => 5,
        }
    }

    /// `None` for pawns and kings, which are not promotion targets here.
    pub fn from_role(role: Role) -> Option<Self> {
        match role {
            Role::Knight => Some(Promotion::Knight),
            Role::Bishop => Some(Promotion::Bishop),
            Role::Rook => Some(Promotion::Rook),
            Role::Queen => Some(Promotion::Queen),
            Role::Pawn | Role::King => None,
        }
    }

    pub const fn char(self) -> char {
        match self {
            Promotion::Knight => 'n',
            Promotion::Bishop => 'b',
            Promotion::Rook => 'r',
            Promotion::Queen => 'q',
        }
    }
}

/// One ply: source square, destination square, optional promotion.
///
/// No legality is implied; any pair of squares is a valid `Move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Promotion>,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub const fn promoting(from: Square, to: Square, piece: Promotion) -> Self {
        Self {
            from,
            to,
            promotion: Some(piece),
        }
    }

    /// Convert a UCI move. Drops and null moves have no square pair.
    pub fn from_uci(uci: &UciMove) -> Result<Self, CatalogError> {
        match *uci {
            UciMove::Normal {
                from,
                to,
                promotion: None,
            } => Ok(Move::new(from, to)),
            UciMove::Normal {
                from,
                to,
                promotion: Some(role),
            } => Promotion::from_role(role)
                .map(|piece| Move::promoting(from, to, piece))
                .ok_or_else(|| CatalogError::InvalidNotation(uci.to_string())),
            _ => Err(CatalogError::InvalidNotation(uci.to_string())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = CatalogError;

    /// Square-pair notation: `e2e4`, `e7e8q`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let uci: UciMove = token
            .parse()
            .map_err(|_| CatalogError::InvalidNotation(token.to_string()))?;
        Move::from_uci(&uci)
    }
}

pub fn encode_move(mv: Move) -> MoveCode {
    let from = mv.from as u8;
    let to = mv.to as u8;
    match mv.promotion {
        Some(piece) => [
            from + PROMOTION_FLAG,
            to + PROMOTION_FLAG * (piece.rank() - 2),
        ],
        None => [from, to],
    }
}

/// Total over all byte pairs. A first byte of 64 or more marks a promotion.
pub fn decode_move(code: MoveCode) -> Move {
    let [first, second] = code;
    if first >= PROMOTION_FLAG {
        let piece = PROMOTIONS[usize::from(second / PROMOTION_FLAG)];
        Move::promoting(square(first), square(second), piece)
    } else {
        Move::new(square(first), square(second))
    }
}

fn square(byte: u8) -> Square {
    Square::new(u32::from(byte % 64))
}

/// Byte string of concatenated [`MoveCode`]s, always of even length.
///
/// Ordering is plain lexicographic byte order, which is what an ordered
/// index sorts by.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceKey(Vec<u8>);

impl SequenceKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap stored bytes, rejecting a trailing half move.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CatalogError> {
        if bytes.len() % 2 != 0 {
            return Err(CatalogError::MalformedSequence { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of moves, not bytes.
    pub fn len(&self) -> usize {
        self.0.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, mv: Move) {
        self.0.extend_from_slice(&encode_move(mv));
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.0
            .chunks_exact(2)
            .map(|pair| decode_move([pair[0], pair[1]]))
    }

    /// Key of the first `plies` moves (or the whole key if shorter).
    pub fn truncated(&self, plies: usize) -> SequenceKey {
        let end = self.0.len().min(plies * 2);
        SequenceKey(self.0[..end].to_vec())
    }
}

impl Borrow<[u8]> for SequenceKey {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for SequenceKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromIterator<Move> for SequenceKey {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut key = SequenceKey::new();
        for mv in iter {
            key.push(mv);
        }
        key
    }
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mv) in self.moves().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{mv}")?;
        }
        Ok(())
    }
}

impl FromStr for SequenceKey {
    type Err = CatalogError;

    /// Whitespace-separated square-pair moves.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace().map(str::parse::<Move>).collect()
    }
}

impl Serialize for SequenceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn encode_moves(moves: &[Move]) -> SequenceKey {
    moves.iter().copied().collect()
}

pub fn decode_moves(bytes: &[u8]) -> Result<Vec<Move>, CatalogError> {
    if bytes.len() % 2 != 0 {
        return Err(CatalogError::MalformedSequence { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| decode_move([pair[0], pair[1]]))
        .collect())
}

/// Parse square-pair tokens (`e2e4`, `e7e8q`) and encode them in order.
pub fn encode_moves_from_notation<S: AsRef<str>>(tokens: &[S]) -> Result<SequenceKey, CatalogError> {
    tokens.iter().map(|t| t.as_ref().parse::<Move>()).collect()
}

pub fn decode_moves_to_notation(bytes: &[u8]) -> Result<Vec<String>, CatalogError> {
    Ok(decode_moves(bytes)?.iter().map(Move::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn test_plain_move_is_square_pair() {
        assert_eq!(encode_move(mv("e2e4")), [12, 28]);
        assert_eq!(decode_move([12, 28]), mv("e2e4"));
    }

    #[test]
    fn test_promotion_layout() {
        // a7a8 as each piece: from 48, to 56
        assert_eq!(encode_move(mv("a7a8n")), [112, 56]);
        assert_eq!(encode_move(mv("a7a8b")), [112, 120]);
        assert_eq!(encode_move(mv("a7a8r")), [112, 184]);
        assert_eq!(encode_move(mv("a7a8q")), [112, 248]);
    }

    #[test]
    fn test_highest_code_byte_is_queen_promotion() {
        let m = Move::promoting(Square::G7, Square::H8, Promotion::Queen);
        assert_eq!(encode_move(m), [118, 255]);
        assert_eq!(decode_move([118, 255]), m);
    }

    #[test]
    fn test_queen_promotion_from_8_to_0_differs_from_plain_move() {
        let promo = Move::promoting(Square::A2, Square::A1, Promotion::Queen);
        let plain = Move::new(Square::A2, Square::A1);
        let promo_code = encode_move(promo);
        let plain_code = encode_move(plain);
        assert_eq!(plain_code, [8, 0]);
        assert_eq!(promo_code, [72, 192]);
        assert_ne!(promo_code, plain_code);
        assert_eq!(decode_move(promo_code), promo);
        assert_eq!(decode_move(plain_code), plain);
    }

    #[test]
    fn test_promotion_flag_boundary() {
        // 63 is the last plain source square
        assert_eq!(decode_move([63, 0]), Move::new(Square::H8, Square::A1));
        // 64 is a promotion from a1
        assert_eq!(
            decode_move([64, 0]),
            Move::promoting(Square::A1, Square::A1, Promotion::Knight)
        );
        assert_eq!(
            decode_move([65, 0]),
            Move::promoting(Square::B1, Square::A1, Promotion::Knight)
        );
    }

    #[test]
    fn test_every_move_round_trips() {
        let pieces = [
            None,
            Some(Promotion::Knight),
            Some(Promotion::Bishop),
            Some(Promotion::Rook),
            Some(Promotion::Queen),
        ];
        for from in (0..64).map(Square::new) {
            for to in (0..64).map(Square::new) {
                for promotion in pieces {
                    let m = Move { from, to, promotion };
                    assert_eq!(decode_move(encode_move(m)), m, "{m}");
                }
            }
        }
    }

    #[test]
    fn test_every_byte_pair_decodes() {
        for first in 0..=u8::MAX {
            for second in 0..=u8::MAX {
                let _ = decode_move([first, second]);
            }
        }
    }

    #[test]
    fn test_odd_length_is_malformed() {
        assert_eq!(
            decode_moves(&[0x01]),
            Err(CatalogError::MalformedSequence { len: 1 })
        );
        assert!(SequenceKey::from_bytes(vec![12, 28, 52]).is_err());
        assert_eq!(decode_moves(&[]), Ok(vec![]));
    }

    #[test]
    fn test_sequence_round_trip() {
        let line = vec![mv("e2e4"), mv("e7e5"), mv("g1f3"), mv("b8c6"), mv("b7b8q")];
        let key = encode_moves(&line);
        assert_eq!(key.as_bytes().len(), 2 * line.len());
        assert_eq!(key.len(), line.len());
        assert_eq!(decode_moves(key.as_bytes()).unwrap(), line);
        assert_eq!(key.moves().collect::<Vec<_>>(), line);
    }

    #[test]
    fn test_notation_parsing() {
        let key = encode_moves_from_notation(&["e2e4", "e7e5", "e7e8q"]).unwrap();
        assert_eq!(key.to_string(), "e2e4 e7e5 e7e8q");
        assert_eq!(
            decode_moves_to_notation(key.as_bytes()).unwrap(),
            vec!["e2e4", "e7e5", "e7e8q"]
        );
        assert_eq!("e2e4 e7e5 e7e8q".parse::<SequenceKey>().unwrap(), key);
    }

    #[test]
    fn test_bad_notation_is_rejected() {
        for bad in ["", "e2", "e9e4", "z2e4", "e2e4x", "Ng1f3", "e7e8k", "0000"] {
            assert!(
                matches!(bad.parse::<Move>(), Err(CatalogError::InvalidNotation(_))),
                "{bad:?} should not parse"
            );
        }
        assert!(encode_moves_from_notation(&["e2e4", "nonsense"]).is_err());
    }

    #[test]
    fn test_truncated_key() {
        let key: SequenceKey = "e2e4 e7e5 g1f3".parse().unwrap();
        assert_eq!(key.truncated(2).to_string(), "e2e4 e7e5");
        assert_eq!(key.truncated(10), key);
    }
}
