//! 终局判定
//!
//! 困毙（无子可动但未被将军）与将死一样判负，不算和棋。

use crate::board::Board;
use crate::movegen::generate_legal_moves;
use crate::types::{Color, GameStatus};
use crate::validator::is_in_check;

/// 被将军且无合法走法
pub fn is_checkmate(board: &Board, color: Color) -> bool {
    is_in_check(board, color) && generate_legal_moves(board, color).is_empty()
}

/// 未被将军但无合法走法
pub fn is_stalemate(board: &Board, color: Color) -> bool {
    !is_in_check(board, color) && generate_legal_moves(board, color).is_empty()
}

/// 轮到 `current_turn` 走棋时的对局状态
pub fn get_game_status(board: &Board, current_turn: Color) -> GameStatus {
    if generate_legal_moves(board, current_turn).is_empty() {
        GameStatus::win_for(current_turn.opponent())
    } else {
        GameStatus::Playing
    }
}
