//! Xiangqi Engine
//!
//! 中国象棋规则引擎 + AI 对手 - 支持 FEN 输入输出

pub mod ai;
pub mod board;
pub mod fen;
pub mod game_rules;
pub mod movegen;
pub mod piece_rules;
pub mod types;
pub mod validator;

pub use ai::eval::evaluate;
pub use ai::{AiDifficulty, AiEngine, DifficultyError, SearchInfo, AVAILABLE_DIFFICULTIES, CHECKMATE_SCORE};
pub use board::Board;
pub use fen::{parse_fen, to_fen, FenError, INITIAL_FEN};
pub use game_rules::{get_game_status, is_checkmate, is_stalemate};
pub use movegen::{generate_capture_moves, generate_legal_moves, generate_legal_moves_from, generate_moves};
pub use types::{Color, GameStatus, Move, Piece, PieceType, Position};
pub use validator::{has_generals_facing, is_in_check, is_legal};
