//! 象棋核心类型定义
//!
//! 坐标约定：row 0 是黑方底线，row 9 是红方底线；col 0-8 从左到右。
//! 红方向 row 减小的方向前进，黑方向 row 增大的方向前进。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 棋子颜色/阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// 获取对方阵营
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// 用作表索引（红 0，黑 1）
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Black => 1,
        }
    }

    /// 兵/卒的前进方向（row 增量）
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Color::Red => -1,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// 棋子类型
///
/// 顺序固定，用作子力价值表、位置分表和 Zobrist 表的索引。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceType {
    /// 将/帅
    General,
    /// 士/仕
    Advisor,
    /// 象/相
    Elephant,
    /// 马
    Horse,
    /// 车
    Chariot,
    /// 炮
    Cannon,
    /// 卒/兵
    Soldier,
}

impl PieceType {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// 子力价值
    #[inline]
    pub fn value(self) -> i32 {
        match self {
            PieceType::General => 10000,
            PieceType::Chariot => 900,
            PieceType::Cannon => 450,
            PieceType::Horse => 400,
            PieceType::Elephant => 200,
            PieceType::Advisor => 200,
            PieceType::Soldier => 100,
        }
    }

    /// 从 FEN 字符解析（大小写不敏感，象/马兼容两种写法）
    pub fn from_fen_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceType::General),
            'a' => Some(PieceType::Advisor),
            'b' | 'e' => Some(PieceType::Elephant),
            'n' | 'h' => Some(PieceType::Horse),
            'r' => Some(PieceType::Chariot),
            'c' => Some(PieceType::Cannon),
            'p' => Some(PieceType::Soldier),
            _ => None,
        }
    }

    /// 转换为 FEN 字符（小写）
    pub fn to_fen_char(self) -> char {
        match self {
            PieceType::General => 'k',
            PieceType::Advisor => 'a',
            PieceType::Elephant => 'b',
            PieceType::Horse => 'n',
            PieceType::Chariot => 'r',
            PieceType::Cannon => 'c',
            PieceType::Soldier => 'p',
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::General => "General",
            PieceType::Advisor => "Advisor",
            PieceType::Elephant => "Elephant",
            PieceType::Horse => "Horse",
            PieceType::Chariot => "Chariot",
            PieceType::Cannon => "Cannon",
            PieceType::Soldier => "Soldier",
        };
        write!(f, "{}", name)
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Piece { piece_type, color }
    }

    /// FEN 字符：红方大写，黑方小写
    pub fn to_fen_char(self) -> char {
        let c = self.piece_type.to_fen_char();
        match self.color {
            Color::Red => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let piece_type = PieceType::from_fen_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::Red
        } else {
            Color::Black
        };
        Some(Piece { piece_type, color })
    }
}

/// 棋盘位置 (row, col)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const ROWS: i8 = 10;
    pub const COLS: i8 = 9;

    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..Self::ROWS).contains(&self.row) && (0..Self::COLS).contains(&self.col)
    }

    /// 检查位置是否在该方九宫格内
    #[inline]
    pub fn is_in_palace(&self, color: Color) -> bool {
        if !(3..=5).contains(&self.col) {
            return false;
        }
        match color {
            Color::Black => (0..=2).contains(&self.row),
            Color::Red => (7..=9).contains(&self.row),
        }
    }

    /// 检查位置是否在己方半场
    #[inline]
    pub fn is_on_side(&self, color: Color) -> bool {
        match color {
            Color::Black => (0..=4).contains(&self.row),
            Color::Red => (5..=9).contains(&self.row),
        }
    }

    /// 是否已过河
    #[inline]
    pub fn has_passed_river(&self, color: Color) -> bool {
        self.is_valid() && !self.is_on_side(color)
    }

    /// 位置加偏移量（结果可能越界，由调用方检查）
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 0..90 的数组下标
    #[inline]
    pub fn to_index(&self) -> usize {
        (self.row as usize) * 9 + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Position {
        Position {
            row: (idx / 9) as i8,
            col: (idx % 9) as i8,
        }
    }

    /// ICCS 坐标（如 "h2"）：列 a-i，行号从红方底线 0 数起
    pub fn to_iccs(&self) -> String {
        let file = (b'a' + self.col as u8) as char;
        format!("{}{}", file, 9 - self.row)
    }

    /// 从 ICCS 坐标解析
    pub fn from_iccs(s: &str) -> Option<Position> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = match bytes[0] {
            b'a'..=b'i' => (bytes[0] - b'a') as i8,
            _ => return None,
        };
        let rank = match bytes[1] {
            b'0'..=b'9' => (bytes[1] - b'0') as i8,
            _ => return None,
        };
        Some(Position::new(9 - rank, col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iccs())
    }
}

/// 走法
///
/// 置换表、杀手表和历史表只用 (from, to) 识别走法，见 [`Move::key`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

impl Move {
    #[inline]
    pub fn new(from: Position, to: Position, piece: Piece, captured: Option<Piece>) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// 紧凑编码：from 下标占高位，to 下标占低 7 位。
    ///
    /// 0 保留为“无走法”，真实走法 from != to，不会编码为 0。
    #[inline]
    pub fn key(&self) -> u16 {
        ((self.from.to_index() as u16) << 7) | self.to.to_index() as u16
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from.to_iccs(), self.to.to_iccs())
    }
}

/// 对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    RedWins,
    BlackWins,
    Draw,
}

impl GameStatus {
    /// 该方获胜的状态
    pub fn win_for(color: Color) -> GameStatus {
        match color {
            Color::Red => GameStatus::RedWins,
            Color::Black => GameStatus::BlackWins,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::Playing => "playing",
            GameStatus::RedWins => "red_wins",
            GameStatus::BlackWins => "black_wins",
            GameStatus::Draw => "draw",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_iccs() {
        assert_eq!(Position::new(9, 0).to_iccs(), "a0");
        assert_eq!(Position::new(7, 7).to_iccs(), "h2");
        assert_eq!(Position::new(0, 8).to_iccs(), "i9");
        assert_eq!(Position::from_iccs("h2"), Some(Position::new(7, 7)));
        assert_eq!(Position::from_iccs("j0"), None);
        assert_eq!(Position::from_iccs("a"), None);
    }

    #[test]
    fn test_palace_and_river() {
        assert!(Position::new(0, 4).is_in_palace(Color::Black));
        assert!(!Position::new(0, 4).is_in_palace(Color::Red));
        assert!(Position::new(9, 3).is_in_palace(Color::Red));
        assert!(!Position::new(8, 6).is_in_palace(Color::Red));

        assert!(Position::new(5, 0).is_on_side(Color::Red));
        assert!(Position::new(4, 0).has_passed_river(Color::Red));
        assert!(!Position::new(5, 0).has_passed_river(Color::Red));
        assert!(Position::new(5, 0).has_passed_river(Color::Black));
        assert!(!Position::new(4, 0).has_passed_river(Color::Black));
    }

    #[test]
    fn test_position_index() {
        for row in 0..10 {
            for col in 0..9 {
                let pos = Position::new(row, col);
                assert_eq!(Position::from_index(pos.to_index()), pos);
            }
        }
    }

    #[test]
    fn test_move_key_never_zero() {
        let piece = Piece::new(PieceType::Chariot, Color::Red);
        let mv = Move::new(Position::new(0, 0), Position::new(0, 1), piece, None);
        assert_ne!(mv.key(), 0);
        let other = Move::new(Position::new(0, 1), Position::new(0, 0), piece, None);
        assert_ne!(mv.key(), other.key());
    }

    #[test]
    fn test_piece_fen_char() {
        let p = Piece::new(PieceType::Horse, Color::Red);
        assert_eq!(p.to_fen_char(), 'N');
        assert_eq!(Piece::from_fen_char('N'), Some(p));
        assert_eq!(
            Piece::from_fen_char('e'),
            Some(Piece::new(PieceType::Elephant, Color::Black))
        );
        assert_eq!(Piece::from_fen_char('x'), None);
    }
}
