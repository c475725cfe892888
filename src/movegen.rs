//! 走法生成
//!
//! 组合 [`piece_rules`](crate::piece_rules) 与 [`validator`](crate::validator)，
//! 提供伪合法、合法和仅吃子三种走法列表。

use crate::board::Board;
use crate::piece_rules::get_moves;
use crate::types::{Color, Move, Position};
use crate::validator::is_legal;

/// 某方所有伪合法走法
pub fn generate_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (from, piece) in board.pieces(Some(color)) {
        for to in get_moves(piece, from, board) {
            moves.push(Move::new(from, to, piece, board.get(to)));
        }
    }
    moves
}

/// 某方所有合法走法
pub fn generate_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    generate_moves(board, color)
        .into_iter()
        .filter(|mv| is_legal(mv, board))
        .collect()
}

/// 某个位置上棋子的合法走法，空格返回空列表
pub fn generate_legal_moves_from(board: &Board, position: Position) -> Vec<Move> {
    let piece = match board.get(position) {
        Some(p) => p,
        None => return Vec::new(),
    };
    get_moves(piece, position, board)
        .into_iter()
        .map(|to| Move::new(position, to, piece, board.get(to)))
        .filter(|mv| is_legal(mv, board))
        .collect()
}

/// 吃子走法（伪合法，供静态搜索使用）
pub fn generate_capture_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(16);
    for (from, piece) in board.pieces(Some(color)) {
        for to in get_moves(piece, from, board) {
            if let Some(target) = board.get(to) {
                if target.color != color {
                    moves.push(Move::new(from, to, piece, Some(target)));
                }
            }
        }
    }
    moves
}
