//! 棋盘
//!
//! 使用 90 格数组存储棋子，并缓存双方将的位置。
//!
//! 两种修改方式并存：
//! - [`Board::apply_move`] / [`Board::with_piece`] 返回新棋盘，交给外部调用方使用；
//! - [`Board::make_move`] / [`Board::unmake_move`] 原地修改，只供搜索热路径使用，
//!   必须严格后进先出：撤销的走法必须是最近一次执行的那一步。

use crate::fen::FenError;
use crate::types::{Color, Move, Piece, PieceType, Position};
use std::fmt;
use std::ops::Index;

const SQUARES: usize = 90;

/// 初始局面的底线排列（从 col 0 到 col 8）
const BACK_RANK: [PieceType; 9] = [
    PieceType::Chariot,
    PieceType::Horse,
    PieceType::Elephant,
    PieceType::Advisor,
    PieceType::General,
    PieceType::Advisor,
    PieceType::Elephant,
    PieceType::Horse,
    PieceType::Chariot,
];

/// 10 x 9 棋盘
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; SQUARES],
    /// 缓存双方将的位置，按 Color::index() 索引
    generals: [Option<Position>; 2],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    /// 空棋盘
    pub fn empty() -> Board {
        Board {
            squares: [None; SQUARES],
            generals: [None; 2],
        }
    }

    /// 标准开局
    pub fn initial() -> Board {
        let mut board = Board::empty();
        for (color, back, cannon, soldier) in [(Color::Black, 0, 2, 3), (Color::Red, 9, 7, 6)] {
            for (col, pt) in BACK_RANK.iter().enumerate() {
                board.put(Position::new(back, col as i8), Some(Piece::new(*pt, color)));
            }
            for col in [1, 7] {
                board.put(
                    Position::new(cannon, col),
                    Some(Piece::new(PieceType::Cannon, color)),
                );
            }
            for col in [0, 2, 4, 6, 8] {
                board.put(
                    Position::new(soldier, col),
                    Some(Piece::new(PieceType::Soldier, color)),
                );
            }
        }
        board
    }

    /// 获取某位置的棋子，越界返回 None
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()]
    }

    /// 检查位置是否有棋子
    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        pos.is_valid() && self.squares[pos.to_index()].is_some()
    }

    /// 原地放置（或清除）棋子，用于构造局面
    pub fn put(&mut self, pos: Position, piece: Option<Piece>) {
        if !pos.is_valid() {
            return;
        }
        let idx = pos.to_index();
        if let Some(old) = self.squares[idx] {
            if old.piece_type == PieceType::General && self.generals[old.color.index()] == Some(pos)
            {
                self.generals[old.color.index()] = None;
            }
        }
        if let Some(p) = piece {
            if p.piece_type == PieceType::General {
                self.generals[p.color.index()] = Some(pos);
            }
        }
        self.squares[idx] = piece;
    }

    /// 返回放置（或清除）棋子后的新棋盘
    pub fn with_piece(&self, pos: Position, piece: Option<Piece>) -> Board {
        let mut board = self.clone();
        board.put(pos, piece);
        board
    }

    /// 返回执行走法后的新棋盘，自身不变
    pub fn apply_move(&self, mv: &Move) -> Board {
        let mut board = self.clone();
        board.make_move(mv);
        board
    }

    /// 原地执行走法
    ///
    /// `mv.captured` 必须等于 `mv.to` 上原有的棋子。
    #[inline]
    pub fn make_move(&mut self, mv: &Move) {
        let from_idx = mv.from.to_index();
        let to_idx = mv.to.to_index();
        debug_assert_eq!(self.squares[to_idx], mv.captured);

        if let Some(cap) = mv.captured {
            if cap.piece_type == PieceType::General {
                self.generals[cap.color.index()] = None;
            }
        }
        if mv.piece.piece_type == PieceType::General {
            self.generals[mv.piece.color.index()] = Some(mv.to);
        }

        self.squares[from_idx] = None;
        self.squares[to_idx] = Some(mv.piece);
    }

    /// 撤销最近一次 [`Board::make_move`]
    #[inline]
    pub fn unmake_move(&mut self, mv: &Move) {
        let from_idx = mv.from.to_index();
        let to_idx = mv.to.to_index();

        if mv.piece.piece_type == PieceType::General {
            self.generals[mv.piece.color.index()] = Some(mv.from);
        }
        if let Some(cap) = mv.captured {
            if cap.piece_type == PieceType::General {
                self.generals[cap.color.index()] = Some(mv.to);
            }
        }

        self.squares[from_idx] = Some(mv.piece);
        self.squares[to_idx] = mv.captured;
    }

    /// 找到将的位置（使用缓存）
    #[inline]
    pub fn find_general(&self, color: Color) -> Option<Position> {
        self.generals[color.index()]
    }

    /// 同一行或同一列上两点之间（不含端点）的棋子数
    ///
    /// 两点不共线时返回 0。
    pub fn count_pieces_between(&self, a: Position, b: Position) -> usize {
        if a.row == b.row {
            let (lo, hi) = (a.col.min(b.col), a.col.max(b.col));
            ((lo + 1)..hi)
                .filter(|&col| self.is_occupied(Position::new(a.row, col)))
                .count()
        } else if a.col == b.col {
            let (lo, hi) = (a.row.min(b.row), a.row.max(b.row));
            ((lo + 1)..hi)
                .filter(|&row| self.is_occupied(Position::new(row, a.col)))
                .count()
        } else {
            0
        }
    }

    /// 遍历所有棋子，可按颜色过滤
    pub fn pieces(&self, color: Option<Color>) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(idx, sq)| sq.map(|p| (Position::from_index(idx), p)))
            .filter(move |(_, p)| color.map_or(true, |c| p.color == c))
    }

    /// 某种棋子的数量
    pub fn count(&self, piece: Piece) -> usize {
        self.squares.iter().filter(|sq| **sq == Some(piece)).count()
    }

    /// 按 ICCS 走法（如 "h2e2"）在当前局面上构造走法
    ///
    /// 只检查起点有子，不检查合法性。
    pub fn parse_move(&self, s: &str) -> Result<Move, FenError> {
        let s = s.trim();
        let invalid = || FenError::InvalidMove(s.to_string());
        if s.len() != 4 || !s.is_ascii() {
            return Err(invalid());
        }
        let from = Position::from_iccs(&s[0..2]).ok_or_else(invalid)?;
        let to = Position::from_iccs(&s[2..4]).ok_or_else(invalid)?;
        let piece = self.get(from).ok_or_else(invalid)?;
        Ok(Move::new(from, to, piece, self.get(to)))
    }
}

impl Index<Position> for Board {
    type Output = Option<Piece>;

    /// 越界位置会 panic，需要宽松访问时使用 [`Board::get`]
    fn index(&self, pos: Position) -> &Option<Piece> {
        assert!(pos.is_valid(), "position out of board: {:?}", pos);
        &self.squares[pos.to_index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..Position::ROWS {
            write!(f, "{} ", 9 - row)?;
            for col in 0..Position::COLS {
                let c = self
                    .get(Position::new(row, col))
                    .map_or('.', |p| p.to_fen_char());
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
            if row == 4 {
                writeln!(f, "  ---------")?;
            }
        }
        write!(f, "  abcdefghi")
    }
}
