//! 将军检测与走法合法性
//!
//! `is_in_check` 的语义是“任一对方棋子的伪合法走法能到达己方将的位置”。
//! 这里用反向扫描实现，不生成完整走法列表；结果与逐子生成走法完全一致。

use crate::board::Board;
use crate::piece_rules::{DIAGONAL, HORSE_JUMPS, ORTHOGONAL};
use crate::types::{Color, Move, PieceType, Position};

/// 是否被将军（没有将视为被将军）
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.find_general(color) {
        Some(pos) => is_square_attacked(board, pos, color.opponent()),
        None => true,
    }
}

/// 将帅是否照面：同列且中间无子
pub fn has_generals_facing(board: &Board) -> bool {
    match (
        board.find_general(Color::Red),
        board.find_general(Color::Black),
    ) {
        (Some(red), Some(black)) => {
            red.col == black.col && board.count_pieces_between(red, black) == 0
        }
        _ => false,
    }
}

/// 走法是否合法
///
/// 在棋盘副本上执行走法，要求走后己方不被将军且将帅不照面。
///
/// 比这两条规则更严：吃将的走法一律不合法，搜索也不会走出飞将吃将。
/// 正常对局中不会出现能吃将的局面；`piece_rules` 仍然生成这类目标格，
/// 只用于将军检测。
pub fn is_legal(mv: &Move, board: &Board) -> bool {
    if captures_general(mv) {
        return false;
    }
    let after = board.apply_move(mv);
    !is_in_check(&after, mv.piece.color) && !has_generals_facing(&after)
}

/// 原地版本：`board` 上已经执行了 `mv`，同样拒绝吃将
#[inline]
pub fn leaves_legal_position(board: &Board, mv: &Move) -> bool {
    !captures_general(mv) && !is_in_check(board, mv.piece.color) && !has_generals_facing(board)
}

#[inline]
fn captures_general(mv: &Move) -> bool {
    mv.captured
        .map_or(false, |p| p.piece_type == PieceType::General)
}

/// 检测 `target` 是否被 `attacker` 方的任一棋子攻击
pub fn is_square_attacked(board: &Board, target: Position, attacker: Color) -> bool {
    // 己方棋子所在格不算被攻击
    if board.get(target).map_or(false, |p| p.color == attacker) {
        return false;
    }

    let is_attacker = |pos: Position, pt: PieceType| {
        board
            .get(pos)
            .map_or(false, |p| p.color == attacker && p.piece_type == pt)
    };

    // 车/炮/将：直线
    for (dr, dc) in ORTHOGONAL {
        let mut pos = target.offset(dr, dc);
        let mut steps = 1;
        let mut found_screen = false;
        while pos.is_valid() {
            if let Some(piece) = board.get(pos) {
                if !found_screen {
                    if piece.color == attacker {
                        match piece.piece_type {
                            PieceType::Chariot => return true,
                            PieceType::General => {
                                if steps == 1 && target.is_in_palace(attacker) {
                                    return true;
                                }
                                // 飞将只针对对方的将
                                if dc == 0 && board.find_general(attacker.opponent()) == Some(target)
                                {
                                    return true;
                                }
                            }
                            _ => {}
                        }
                    }
                    found_screen = true;
                } else {
                    if piece.color == attacker && piece.piece_type == PieceType::Cannon {
                        return true;
                    }
                    break;
                }
            }
            pos = pos.offset(dr, dc);
            steps += 1;
        }
    }

    // 马：从落点反推马的位置，马腿紧挨着马
    for ((dr, dc), (lr, lc)) in HORSE_JUMPS {
        let horse_pos = target.offset(-dr, -dc);
        if is_attacker(horse_pos, PieceType::Horse) && !board.is_occupied(horse_pos.offset(lr, lc))
        {
            return true;
        }
    }

    // 兵：正前方总能攻击，过河后可横向攻击
    if is_attacker(target.offset(-attacker.forward(), 0), PieceType::Soldier) {
        return true;
    }
    for dc in [-1, 1] {
        let soldier_pos = target.offset(0, dc);
        if soldier_pos.has_passed_river(attacker) && is_attacker(soldier_pos, PieceType::Soldier) {
            return true;
        }
    }

    // 士、象：目标必须在其活动范围内
    if target.is_in_palace(attacker) {
        for (dr, dc) in DIAGONAL {
            if is_attacker(target.offset(dr, dc), PieceType::Advisor) {
                return true;
            }
        }
    }
    if target.is_on_side(attacker) {
        for (dr, dc) in DIAGONAL {
            let elephant_pos = target.offset(2 * dr, 2 * dc);
            if is_attacker(elephant_pos, PieceType::Elephant)
                && !board.is_occupied(target.offset(dr, dc))
            {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::movegen::generate_moves;
    use crate::piece_rules::get_moves;
    use crate::types::Piece;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// 按定义逐子生成走法的慢速版本
    fn attacked_by_definition(board: &Board, target: Position, attacker: Color) -> bool {
        board
            .pieces(Some(attacker))
            .any(|(pos, piece)| get_moves(piece, pos, board).contains(&target))
    }

    fn assert_scan_matches_definition(board: &Board) {
        for idx in 0..90 {
            let target = Position::from_index(idx);
            for attacker in [Color::Red, Color::Black] {
                assert_eq!(
                    is_square_attacked(board, target, attacker),
                    attacked_by_definition(board, target, attacker),
                    "target {:?} attacker {:?}\n{}",
                    target,
                    attacker,
                    board
                );
            }
        }
    }

    #[test]
    fn test_check_detection() {
        let mut board = Board::empty();
        board.put(
            Position::new(0, 4),
            Some(Piece::new(PieceType::General, Color::Black)),
        );
        board.put(
            Position::new(9, 3),
            Some(Piece::new(PieceType::General, Color::Red)),
        );
        board.put(
            Position::new(1, 4),
            Some(Piece::new(PieceType::Chariot, Color::Red)),
        );

        assert!(is_in_check(&board, Color::Black));
        assert!(!is_in_check(&board, Color::Red));
    }

    #[test]
    fn test_missing_general_counts_as_check() {
        let board = Board::empty();
        assert!(is_in_check(&board, Color::Red));
        assert!(is_in_check(&board, Color::Black));
    }

    #[test]
    fn test_generals_facing() {
        let mut board = Board::empty();
        board.put(
            Position::new(0, 4),
            Some(Piece::new(PieceType::General, Color::Black)),
        );
        board.put(
            Position::new(9, 4),
            Some(Piece::new(PieceType::General, Color::Red)),
        );
        assert!(has_generals_facing(&board));

        let blocked = board.with_piece(
            Position::new(4, 4),
            Some(Piece::new(PieceType::Soldier, Color::Red)),
        );
        assert!(!has_generals_facing(&blocked));

        let moved = board
            .with_piece(Position::new(9, 4), None)
            .with_piece(
                Position::new(9, 3),
                Some(Piece::new(PieceType::General, Color::Red)),
            );
        assert!(!has_generals_facing(&moved));
        assert!(!has_generals_facing(&Board::empty()));
    }

    #[test]
    fn test_is_legal_rejects_exposing_general() {
        let mut board = Board::empty();
        board.put(
            Position::new(0, 4),
            Some(Piece::new(PieceType::General, Color::Black)),
        );
        board.put(
            Position::new(9, 4),
            Some(Piece::new(PieceType::General, Color::Red)),
        );
        let rook = Piece::new(PieceType::Chariot, Color::Red);
        board.put(Position::new(5, 4), Some(rook));

        // 车离开中线会造成将帅照面
        let exposing = Move::new(Position::new(5, 4), Position::new(5, 0), rook, None);
        assert!(!is_legal(&exposing, &board));
        let staying = Move::new(Position::new(5, 4), Position::new(3, 4), rook, None);
        assert!(is_legal(&staying, &board));
    }

    #[test]
    fn test_general_capture_is_never_legal() {
        let mut board = Board::empty();
        let black = Piece::new(PieceType::General, Color::Black);
        let red = Piece::new(PieceType::General, Color::Red);
        board.put(Position::new(0, 4), Some(black));
        board.put(Position::new(9, 4), Some(red));

        // 飞将仍作为攻击格生成，但不能真的走出来
        assert!(get_moves(red, Position::new(9, 4), &board).contains(&Position::new(0, 4)));
        let flying = Move::new(Position::new(9, 4), Position::new(0, 4), red, Some(black));
        assert!(!is_legal(&flying, &board));

        let mut after = board.clone();
        after.make_move(&flying);
        assert!(!leaves_legal_position(&after, &flying));
    }

    #[test]
    fn test_scan_matches_definition_on_initial_board() {
        assert_scan_matches_definition(&Board::initial());
    }

    #[test]
    fn test_scan_matches_definition_on_random_games() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..8 {
            let mut board = Board::initial();
            let mut turn = Color::Red;
            for _ in 0..60 {
                let moves = generate_moves(&board, turn);
                if moves.is_empty() {
                    break;
                }
                let mv = moves[rng.gen_range(0..moves.len())];
                board.make_move(&mv);
                assert_scan_matches_definition(&board);
                if board.find_general(Color::Red).is_none()
                    || board.find_general(Color::Black).is_none()
                {
                    break;
                }
                turn = turn.opponent();
            }
        }
    }
}
