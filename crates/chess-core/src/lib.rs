//! Chess opening classification by move-sequence prefix.
//!
//! Moves encode to fixed two-byte codes, so a move list is a prefix of
//! another exactly when its encoded key is a byte prefix of the other's.
//! Prefix search then reduces to a range scan over an ordered index.

pub mod catalog;
pub mod codec;
pub mod error;
pub mod game_data;
pub mod memory;
pub mod pgn;
pub mod prefix;

pub use catalog::{
    ancestors_of, games_of, games_of_named, lookup_by_name, openings_matching, openings_of,
    variations_of, Game, Opening, OrderedIndex, RecordId,
};
pub use codec::{
    decode_move, decode_moves, decode_moves_to_notation, encode_move, encode_moves,
    encode_moves_from_notation, Move, MoveCode, Promotion, SequenceKey,
};
pub use error::CatalogError;
pub use game_data::{GameMetadata, PlayerName};
pub use memory::MemoryCatalog;
pub use prefix::{is_prefix_of, starts_with, KeyRange};
