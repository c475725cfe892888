//! FEN 解析和生成
//!
//! 格式: `<棋盘> <走子方> [其余字段忽略]`
//!
//! 棋盘从 row 0（黑方底线）写到 row 9（红方底线），行之间用 `/` 分隔。
//! - 红方：K(帅) A(仕) B/E(相) N/H(马) R(车) C(炮) P(兵)
//! - 黑方：对应小写字母
//! - 空格：数字 (1-9)
//!
//! 走子方：`w` 或 `r` 为红方，`b` 为黑方。

use crate::board::Board;
use crate::types::{Color, Piece, Position};
use thiserror::Error;

/// 标准开局 FEN
pub const INITIAL_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

/// FEN 及走法文本解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("invalid FEN: expected '<board> <side>', got {0:?}")]
    MissingFields(String),

    #[error("invalid board: expected 10 ranks, got {0}")]
    RankCount(usize),

    #[error("rank {rank} has {width} columns, expected 9")]
    RankWidth { rank: usize, width: usize },

    #[error("invalid piece character: {0:?}")]
    InvalidPiece(char),

    #[error("invalid side to move: {0:?}")]
    InvalidSide(String),

    #[error("invalid move: {0:?}")]
    InvalidMove(String),
}

pub type Result<T> = std::result::Result<T, FenError>;

/// 解析 FEN，返回棋盘和走子方
pub fn parse_fen(fen: &str) -> Result<(Board, Color)> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(FenError::MissingFields(fen.to_string()));
    }

    let board = parse_board(parts[0])?;
    let turn = match parts[1] {
        "w" | "r" => Color::Red,
        "b" => Color::Black,
        other => return Err(FenError::InvalidSide(other.to_string())),
    };

    Ok((board, turn))
}

/// 解析棋盘字段
fn parse_board(board_str: &str) -> Result<Board> {
    let ranks: Vec<&str> = board_str.split('/').collect();
    if ranks.len() != 10 {
        return Err(FenError::RankCount(ranks.len()));
    }

    let mut board = Board::empty();

    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col: usize = 0;

        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                col += skip as usize;
                continue;
            }
            let piece = Piece::from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;
            if col < 9 {
                board.put(Position::new(row as i8, col as i8), Some(piece));
            }
            col += 1;
        }

        if col != 9 {
            return Err(FenError::RankWidth {
                rank: row,
                width: col,
            });
        }
    }

    Ok(board)
}

/// 生成 FEN
pub fn to_fen(board: &Board, turn: Color) -> String {
    let mut ranks = Vec::with_capacity(10);

    for row in 0..Position::ROWS {
        let mut rank = String::new();
        let mut empty = 0;
        for col in 0..Position::COLS {
            match board.get(Position::new(row, col)) {
                Some(piece) => {
                    if empty > 0 {
                        rank.push_str(&empty.to_string());
                        empty = 0;
                    }
                    rank.push(piece.to_fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            rank.push_str(&empty.to_string());
        }
        ranks.push(rank);
    }

    let side = match turn {
        Color::Red => 'w',
        Color::Black => 'b',
    };
    format!("{} {}", ranks.join("/"), side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceType;

    #[test]
    fn test_initial_fen_matches_board() {
        let (board, turn) = parse_fen(INITIAL_FEN).unwrap();
        assert_eq!(board, Board::initial());
        assert_eq!(turn, Color::Red);
        assert_eq!(to_fen(&Board::initial(), Color::Red), INITIAL_FEN);
    }

    #[test]
    fn test_parse_alternative_letters() {
        let (board, turn) = parse_fen("4k4/9/9/9/9/4H4/9/4E4/9/4K4 b - - 0 1").unwrap();
        assert_eq!(turn, Color::Black);
        assert_eq!(
            board.get(Position::new(5, 4)),
            Some(Piece::new(PieceType::Horse, Color::Red))
        );
        assert_eq!(
            board.get(Position::new(7, 4)),
            Some(Piece::new(PieceType::Elephant, Color::Red))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_fen("4k4/9/9"),
            Err(FenError::MissingFields("4k4/9/9".to_string()))
        );
        assert_eq!(parse_fen("4k4/9 w"), Err(FenError::RankCount(2)));
        assert_eq!(
            parse_fen("4k3/9/9/9/9/9/9/9/9/4K4 w"),
            Err(FenError::RankWidth { rank: 0, width: 8 })
        );
        assert_eq!(
            parse_fen("4x4/9/9/9/9/9/9/9/9/4K4 w"),
            Err(FenError::InvalidPiece('x'))
        );
        assert_eq!(
            parse_fen("4k4/9/9/9/9/9/9/9/9/4K4 x"),
            Err(FenError::InvalidSide("x".to_string()))
        );
    }

    #[test]
    fn test_missing_general_is_accepted() {
        let (board, _) = parse_fen("9/9/9/9/9/9/9/9/9/4K4 w").unwrap();
        assert_eq!(board.find_general(Color::Black), None);
    }
}
