//! 各兵种的伪合法走法
//!
//! 只考虑九宫、河界、蹩腿、塞象眼和炮架，不检查走后是否被将军。
//! 目标格为己方棋子的走法永远不会生成。

use crate::board::Board;
use crate::types::{Color, Piece, PieceType, Position};

pub(crate) const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(crate) const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 马的跳法：(落点偏移, 马腿偏移)
pub(crate) const HORSE_JUMPS: [((i8, i8), (i8, i8)); 8] = [
    ((2, 1), (1, 0)),
    ((2, -1), (1, 0)),
    ((-2, 1), (-1, 0)),
    ((-2, -1), (-1, 0)),
    ((1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((-1, 2), (0, 1)),
    ((-1, -2), (0, -1)),
];

/// 象的走法：(落点偏移, 象眼偏移)
const ELEPHANT_STEPS: [((i8, i8), (i8, i8)); 4] = [
    ((2, 2), (1, 1)),
    ((2, -2), (1, -1)),
    ((-2, 2), (-1, 1)),
    ((-2, -2), (-1, -1)),
];

/// 获取棋子在 `pos` 上的所有伪合法目标位置
pub fn get_moves(piece: Piece, pos: Position, board: &Board) -> Vec<Position> {
    match piece.piece_type {
        PieceType::General => general_moves(piece.color, pos, board),
        PieceType::Advisor => advisor_moves(piece.color, pos, board),
        PieceType::Elephant => elephant_moves(piece.color, pos, board),
        PieceType::Horse => horse_moves(piece.color, pos, board),
        PieceType::Chariot => chariot_moves(piece.color, pos, board),
        PieceType::Cannon => cannon_moves(piece.color, pos, board),
        PieceType::Soldier => soldier_moves(piece.color, pos, board),
    }
}

#[inline]
fn can_move_to(color: Color, pos: Position, board: &Board) -> bool {
    if !pos.is_valid() {
        return false;
    }
    match board.get(pos) {
        None => true,
        Some(target) => target.color != color,
    }
}

fn general_moves(color: Color, pos: Position, board: &Board) -> Vec<Position> {
    let mut moves = Vec::with_capacity(5);

    for (dr, dc) in ORTHOGONAL {
        let new_pos = pos.offset(dr, dc);
        if new_pos.is_in_palace(color) && can_move_to(color, new_pos, board) {
            moves.push(new_pos);
        }
    }

    // 飞将：同列且中间无子
    if let Some(enemy) = board.find_general(color.opponent()) {
        if enemy.col == pos.col && enemy != pos && board.count_pieces_between(pos, enemy) == 0 {
            moves.push(enemy);
        }
    }

    moves
}

fn advisor_moves(color: Color, pos: Position, board: &Board) -> Vec<Position> {
    DIAGONAL
        .iter()
        .map(|&(dr, dc)| pos.offset(dr, dc))
        .filter(|p| p.is_in_palace(color) && can_move_to(color, *p, board))
        .collect()
}

fn elephant_moves(color: Color, pos: Position, board: &Board) -> Vec<Position> {
    let mut moves = Vec::with_capacity(4);

    for ((dr, dc), (er, ec)) in ELEPHANT_STEPS {
        let new_pos = pos.offset(dr, dc);
        // 象不能过河
        if !new_pos.is_valid() || !new_pos.is_on_side(color) {
            continue;
        }
        // 塞象眼
        if board.is_occupied(pos.offset(er, ec)) {
            continue;
        }
        if can_move_to(color, new_pos, board) {
            moves.push(new_pos);
        }
    }

    moves
}

fn horse_moves(color: Color, pos: Position, board: &Board) -> Vec<Position> {
    let mut moves = Vec::with_capacity(8);

    for ((dr, dc), (lr, lc)) in HORSE_JUMPS {
        let new_pos = pos.offset(dr, dc);
        if !new_pos.is_valid() {
            continue;
        }
        // 蹩马腿
        if board.is_occupied(pos.offset(lr, lc)) {
            continue;
        }
        if can_move_to(color, new_pos, board) {
            moves.push(new_pos);
        }
    }

    moves
}

fn chariot_moves(color: Color, pos: Position, board: &Board) -> Vec<Position> {
    let mut moves = Vec::with_capacity(17);

    for (dr, dc) in ORTHOGONAL {
        let mut new_pos = pos.offset(dr, dc);
        while new_pos.is_valid() {
            match board.get(new_pos) {
                None => moves.push(new_pos),
                Some(target) => {
                    if target.color != color {
                        moves.push(new_pos);
                    }
                    break;
                }
            }
            new_pos = new_pos.offset(dr, dc);
        }
    }

    moves
}

fn cannon_moves(color: Color, pos: Position, board: &Board) -> Vec<Position> {
    let mut moves = Vec::with_capacity(17);

    for (dr, dc) in ORTHOGONAL {
        let mut new_pos = pos.offset(dr, dc);
        let mut found_screen = false;

        while new_pos.is_valid() {
            match board.get(new_pos) {
                None => {
                    if !found_screen {
                        moves.push(new_pos);
                    }
                }
                Some(target) => {
                    if !found_screen {
                        found_screen = true;
                    } else {
                        // 炮架之后遇到的第一个棋子
                        if target.color != color {
                            moves.push(new_pos);
                        }
                        break;
                    }
                }
            }
            new_pos = new_pos.offset(dr, dc);
        }
    }

    moves
}

fn soldier_moves(color: Color, pos: Position, board: &Board) -> Vec<Position> {
    let mut moves = Vec::with_capacity(3);

    let forward_pos = pos.offset(color.forward(), 0);
    if can_move_to(color, forward_pos, board) {
        moves.push(forward_pos);
    }

    // 过河后可以左右走
    if pos.has_passed_river(color) {
        for dc in [-1, 1] {
            let side_pos = pos.offset(0, dc);
            if can_move_to(color, side_pos, board) {
                moves.push(side_pos);
            }
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<Position>) -> Vec<Position> {
        v.sort_by_key(|p| p.to_index());
        v
    }

    fn red(pt: PieceType) -> Piece {
        Piece::new(pt, Color::Red)
    }

    fn black(pt: PieceType) -> Piece {
        Piece::new(pt, Color::Black)
    }

    #[test]
    fn test_general_stays_in_palace() {
        let board = Board::empty();
        let moves = get_moves(red(PieceType::General), Position::new(9, 3), &board);
        assert_eq!(
            sorted(moves),
            sorted(vec![Position::new(8, 3), Position::new(9, 4)])
        );
    }

    #[test]
    fn test_general_flying_capture() {
        let mut board = Board::empty();
        board.put(Position::new(9, 4), Some(red(PieceType::General)));
        board.put(Position::new(0, 4), Some(black(PieceType::General)));
        let moves = get_moves(red(PieceType::General), Position::new(9, 4), &board);
        assert!(moves.contains(&Position::new(0, 4)));

        board.put(Position::new(5, 4), Some(black(PieceType::Soldier)));
        let moves = get_moves(red(PieceType::General), Position::new(9, 4), &board);
        assert!(!moves.contains(&Position::new(0, 4)));
    }

    #[test]
    fn test_advisor_diagonal_in_palace() {
        let board = Board::empty();
        let moves = get_moves(black(PieceType::Advisor), Position::new(0, 3), &board);
        assert_eq!(moves, vec![Position::new(1, 4)]);
        let moves = get_moves(black(PieceType::Advisor), Position::new(1, 4), &board);
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn test_elephant_eye_and_river() {
        let mut board = Board::empty();
        let moves = get_moves(red(PieceType::Elephant), Position::new(5, 2), &board);
        // 不能过河到 row 3
        assert_eq!(
            sorted(moves),
            sorted(vec![Position::new(7, 0), Position::new(7, 4)])
        );

        board.put(Position::new(6, 3), Some(black(PieceType::Soldier)));
        let moves = get_moves(red(PieceType::Elephant), Position::new(5, 2), &board);
        assert_eq!(moves, vec![Position::new(7, 0)]);
    }

    #[test]
    fn test_horse_leg_blocked() {
        let mut board = Board::empty();
        let from = Position::new(5, 4);
        assert_eq!(get_moves(red(PieceType::Horse), from, &board).len(), 8);

        // 蹩住向上的两个跳法
        board.put(Position::new(4, 4), Some(red(PieceType::Soldier)));
        let moves = get_moves(red(PieceType::Horse), from, &board);
        assert_eq!(moves.len(), 6);
        assert!(!moves.contains(&Position::new(3, 3)));
        assert!(!moves.contains(&Position::new(3, 5)));
    }

    #[test]
    fn test_chariot_stops_at_first_piece() {
        let mut board = Board::empty();
        board.put(Position::new(5, 3), Some(black(PieceType::Horse)));
        board.put(Position::new(5, 6), Some(red(PieceType::Soldier)));
        let moves = get_moves(red(PieceType::Chariot), Position::new(5, 4), &board);

        assert!(moves.contains(&Position::new(5, 3)));
        assert!(!moves.contains(&Position::new(5, 2)));
        assert!(moves.contains(&Position::new(5, 5)));
        assert!(!moves.contains(&Position::new(5, 6)));
        // 纵向 9 格 + 左 1 + 右 1
        assert_eq!(moves.len(), 11);
    }

    #[test]
    fn test_cannon_captures_over_exactly_one_screen() {
        let mut board = Board::empty();
        let cannon = red(PieceType::Cannon);
        let from = Position::new(7, 4);
        board.put(Position::new(5, 4), Some(red(PieceType::Soldier)));
        board.put(Position::new(3, 4), Some(black(PieceType::Horse)));
        board.put(Position::new(1, 4), Some(black(PieceType::Chariot)));

        let moves = get_moves(cannon, from, &board);
        assert!(moves.contains(&Position::new(6, 4)));
        // 不能走到炮架上
        assert!(!moves.contains(&Position::new(5, 4)));
        // 不能走到炮架后面的空格
        assert!(!moves.contains(&Position::new(4, 4)));
        // 隔一子吃
        assert!(moves.contains(&Position::new(3, 4)));
        // 隔两子不能吃
        assert!(!moves.contains(&Position::new(1, 4)));
    }

    #[test]
    fn test_cannon_cannot_capture_without_screen() {
        let mut board = Board::empty();
        board.put(Position::new(4, 4), Some(black(PieceType::Horse)));
        let moves = get_moves(red(PieceType::Cannon), Position::new(7, 4), &board);
        assert!(!moves.contains(&Position::new(4, 4)));
        assert!(moves.contains(&Position::new(5, 4)));
    }

    #[test]
    fn test_soldier_before_and_after_river() {
        let board = Board::empty();
        let moves = get_moves(red(PieceType::Soldier), Position::new(6, 2), &board);
        assert_eq!(moves, vec![Position::new(5, 2)]);

        let moves = get_moves(red(PieceType::Soldier), Position::new(4, 2), &board);
        assert_eq!(
            sorted(moves),
            sorted(vec![
                Position::new(3, 2),
                Position::new(4, 1),
                Position::new(4, 3)
            ])
        );

        // 到底线后只能横走
        let moves = get_moves(black(PieceType::Soldier), Position::new(9, 0), &board);
        assert_eq!(moves, vec![Position::new(9, 1)]);
    }

    #[test]
    fn test_never_captures_own_piece() {
        let board = Board::initial();
        for (pos, piece) in board.pieces(None) {
            for to in get_moves(piece, pos, &board) {
                assert!(board.get(to).map_or(true, |t| t.color != piece.color));
            }
        }
    }
}
