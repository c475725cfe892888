//! 静态评估：子力 + 位置分 + 士象完整度
//!
//! 分数从 `perspective` 一方看，正数表示该方占优。
//! 评估严格反对称：`evaluate(b, Red) == -evaluate(b, Black)`。

use crate::board::Board;
use crate::types::{Color, Piece, PieceType, Position};

/// PST (Piece-Square Table)，从红方视角：row 0 是黑方底线，row 9 是红方底线。
/// 黑方查表时上下翻转。
type PstTable = [[i32; 9]; 10];

/// 将/帅：不计位置分
const PST_GENERAL: PstTable = [[0; 9]; 10];

const PST_ADVISOR: PstTable = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 3, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

const PST_ELEPHANT: PstTable = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, -2, 0, 0, 0, -2, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [-2, 0, 0, 0, 3, 0, 0, 0, -2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

const PST_HORSE: PstTable = [
    [4, 8, 16, 12, 4, 12, 16, 8, 4],
    [4, 10, 28, 16, 8, 16, 28, 10, 4],
    [12, 14, 16, 20, 18, 20, 16, 14, 12],
    [8, 24, 18, 24, 20, 24, 18, 24, 8],
    [6, 16, 14, 18, 16, 18, 14, 16, 6],
    [4, 12, 16, 14, 12, 14, 16, 12, 4],
    [2, 6, 8, 6, 10, 6, 8, 6, 2],
    [4, 2, 8, 8, 4, 8, 8, 2, 4],
    [0, 2, 4, 4, -2, 4, 4, 2, 0],
    [0, -4, 0, 0, 0, 0, 0, -4, 0],
];

const PST_CHARIOT: PstTable = [
    [14, 14, 12, 18, 16, 18, 12, 14, 14],
    [16, 20, 18, 24, 26, 24, 18, 20, 16],
    [12, 12, 12, 18, 18, 18, 12, 12, 12],
    [12, 18, 16, 22, 22, 22, 16, 18, 12],
    [12, 14, 12, 18, 18, 18, 12, 14, 12],
    [12, 16, 14, 20, 20, 20, 14, 16, 12],
    [6, 10, 8, 14, 14, 14, 8, 10, 6],
    [4, 8, 6, 14, 12, 14, 6, 8, 4],
    [8, 4, 8, 16, 8, 16, 8, 4, 8],
    [-2, 10, 6, 14, 12, 14, 6, 10, -2],
];

const PST_CANNON: PstTable = [
    [6, 4, 0, -10, -12, -10, 0, 4, 6],
    [2, 2, 0, -4, -14, -4, 0, 2, 2],
    [2, 2, 0, -10, -8, -10, 0, 2, 2],
    [0, 0, -2, 4, 10, 4, -2, 0, 0],
    [0, 0, 0, 2, 8, 2, 0, 0, 0],
    [-2, 0, 4, 2, 6, 2, 4, 0, -2],
    [0, 0, 0, 2, 4, 2, 0, 0, 0],
    [4, 0, 8, 6, 10, 6, 8, 0, 4],
    [0, 2, 4, 6, 6, 6, 4, 2, 0],
    [0, 0, 2, 6, 6, 6, 2, 0, 0],
];

/// 兵：过河后价值大增，逼近九宫最高，沉底兵价值回落
const PST_SOLDIER: PstTable = [
    [0, 3, 6, 9, 12, 9, 6, 3, 0],
    [18, 36, 56, 80, 120, 80, 56, 36, 18],
    [14, 26, 42, 60, 80, 60, 42, 26, 14],
    [10, 20, 30, 34, 40, 34, 30, 20, 10],
    [6, 12, 18, 18, 20, 18, 18, 12, 6],
    [2, 0, 8, 0, 8, 0, 8, 0, 2],
    [0, 0, -2, 0, 4, 0, -2, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// 按 PieceType::index() 排列
const PST: [&PstTable; 7] = [
    &PST_GENERAL,
    &PST_ADVISOR,
    &PST_ELEPHANT,
    &PST_HORSE,
    &PST_CHARIOT,
    &PST_CANNON,
    &PST_SOLDIER,
];

const ADVISOR_GUARD_BONUS: i32 = 15;
const ELEPHANT_GUARD_BONUS: i32 = 10;
/// 士象全
const FULL_GUARD_BONUS: i32 = 40;
/// 仅双士或仅双象
const HALF_GUARD_BONUS: i32 = 15;

/// 位置分，黑方上下翻转查表
#[inline]
pub fn piece_square(piece: Piece, pos: Position) -> i32 {
    let row = match piece.color {
        Color::Red => pos.row as usize,
        Color::Black => 9 - pos.row as usize,
    };
    PST[piece.piece_type.index()][row][pos.col as usize]
}

/// 士象护卫分，每方单独计算
fn king_safety(board: &Board, color: Color) -> i32 {
    let advisors = board.count(Piece::new(PieceType::Advisor, color)) as i32;
    let elephants = board.count(Piece::new(PieceType::Elephant, color)) as i32;

    let mut score = advisors * ADVISOR_GUARD_BONUS + elephants * ELEPHANT_GUARD_BONUS;
    if advisors >= 2 && elephants >= 2 {
        score += FULL_GUARD_BONUS;
    } else if advisors >= 2 || elephants >= 2 {
        score += HALF_GUARD_BONUS;
    }
    score
}

/// 局面评估
pub fn evaluate(board: &Board, perspective: Color) -> i32 {
    let mut score = 0;

    for (pos, piece) in board.pieces(None) {
        let value = piece.piece_type.value() + piece_square(piece, pos);
        if piece.color == perspective {
            score += value;
        } else {
            score -= value;
        }
    }

    score + king_safety(board, perspective) - king_safety(board, perspective.opponent())
}
