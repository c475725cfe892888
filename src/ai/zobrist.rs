//! Zobrist 哈希
//!
//! 随机数表由固定种子生成，进程内只初始化一次，之后只读。

use crate::board::Board;
use crate::types::{Color, Piece, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ZOBRIST_SEED: u64 = 0x5851_F42D_4C95_7F2D;

/// [color][piece_type][square]
pub struct ZobristTable {
    pieces: [[[u64; 90]; 7]; 2],
    side: u64,
}

impl ZobristTable {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut pieces = [[[0u64; 90]; 7]; 2];

        for color in pieces.iter_mut() {
            for piece_type in color.iter_mut() {
                for square in piece_type.iter_mut() {
                    *square = rng.gen();
                }
            }
        }

        ZobristTable {
            pieces,
            side: rng.gen(),
        }
    }
}

lazy_static::lazy_static! {
    static ref ZOBRIST: ZobristTable = ZobristTable::new();
}

/// 单个棋子在某格上的哈希值，用于增量更新
#[inline]
pub fn piece_hash(piece: Piece, pos: Position) -> u64 {
    ZOBRIST.pieces[piece.color.index()][piece.piece_type.index()][pos.to_index()]
}

/// 黑方走棋时异或的常量
#[inline]
pub fn side_hash() -> u64 {
    ZOBRIST.side
}

/// 计算整个局面的哈希
pub fn hash(board: &Board, turn: Color) -> u64 {
    let mut h = board
        .pieces(None)
        .fold(0u64, |acc, (pos, piece)| acc ^ piece_hash(piece, pos));
    if turn == Color::Black {
        h ^= side_hash();
    }
    h
}
