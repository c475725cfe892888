//! AI 搜索引擎
//!
//! 迭代加深 + PVS alpha-beta，包含：
//! - Zobrist 增量哈希 + 数组置换表
//! - 空着裁剪、后期走法削减 (LMR)、将军延伸
//! - 静态搜索（只搜吃子，带 delta 裁剪）
//! - 杀手走法 / 历史表排序
//! - 渴望窗口
//! - 时间限制（每 4096 个节点检查一次）
//!
//! 单线程同步执行。每个引擎实例独占自己的置换表、杀手表和历史表，
//! 并发对局必须各自使用独立实例。

pub mod difficulty;
pub mod eval;
pub mod tt;
pub mod zobrist;

pub use difficulty::{AiDifficulty, DifficultyError, AVAILABLE_DIFFICULTIES};

use crate::board::Board;
use crate::movegen::{generate_capture_moves, generate_legal_moves, generate_moves};
use crate::types::{Color, Move};
use crate::validator::{is_in_check, leaves_legal_position};
use eval::evaluate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::time::{Duration, Instant};
use tt::{TTFlag, TranspositionTable};

// ============================================================================
// 搜索参数
// ============================================================================

/// 胜负分，实际返回值还会按剩余深度偏移
pub const CHECKMATE_SCORE: i32 = 100_000;
const INFINITY: i32 = 1_000_000;

const MAX_PLY: usize = 64;
const NULL_MOVE_R: i32 = 2;
const NULL_MOVE_MIN_DEPTH: i32 = 3;
const LMR_FULL_DEPTH_MOVES: usize = 4;
const LMR_MIN_DEPTH: i32 = 3;
const MAX_CHECK_EXTENSIONS: i32 = 4;
const ASPIRATION_WINDOW: i32 = 50;
const QUIESCENCE_MAX_PLY: i32 = 8;
const DELTA_MARGIN: i32 = 200;
const TIME_CHECK_MASK: u64 = 4096 - 1;

// 走法排序分层
const TT_MOVE_BONUS: i32 = 10_000_000;
const CAPTURE_BONUS: i32 = 2_000_000;
const KILLER_BONUS: [i32; 2] = [900_000, 800_000];
const HISTORY_CAP: i32 = 700_000;

/// 最近一次搜索的统计
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchInfo {
    /// 完整完成的最大深度
    pub depth: u32,
    /// 该深度下最佳走法的分数（不含噪声）
    pub score: i32,
    pub nodes: u64,
    /// 空着搜索次数
    pub null_searches: u64,
    pub elapsed: Duration,
}

pub struct AiEngine {
    difficulty: AiDifficulty,
    rng: StdRng,
    tt: TranspositionTable,
    killers: [[u16; 2]; MAX_PLY],
    /// [color][from][to]
    history: Vec<[[i32; 90]; 90]>,
    nodes: u64,
    null_searches: u64,
    aborted: bool,
    /// 达到 min_depth 后才开始计时
    timer: Option<Instant>,
    last_search: SearchInfo,
}

impl AiEngine {
    pub fn new(difficulty: AiDifficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_entropy())
    }

    /// 固定噪声随机种子，便于复现
    pub fn with_seed(difficulty: AiDifficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: AiDifficulty, rng: StdRng) -> Self {
        AiEngine {
            difficulty,
            rng,
            tt: TranspositionTable::new(),
            killers: [[0; 2]; MAX_PLY],
            history: vec![[[0; 90]; 90]; 2],
            nodes: 0,
            null_searches: 0,
            aborted: false,
            timer: None,
            last_search: SearchInfo::default(),
        }
    }

    pub fn difficulty(&self) -> &AiDifficulty {
        &self.difficulty
    }

    pub fn last_search(&self) -> SearchInfo {
        self.last_search
    }

    /// 为 `color` 选择最佳走法，无合法走法时返回 None
    ///
    /// 传入的棋盘不会被修改。
    pub fn find_best_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        let started = Instant::now();
        self.reset();

        let legal_moves = generate_legal_moves(board, color);
        let mut best_move = *legal_moves.first()?;
        let mut best_score = 0;
        let mut completed = 0;

        let mut board = board.clone();
        let hash = zobrist::hash(&board, color);
        let max_depth = self.difficulty.depth.max(1);

        for depth in 1..=max_depth {
            if self.time_up() {
                break;
            }

            let mut result = if depth <= 2 {
                self.search_root(&mut board, hash, depth as i32, -INFINITY, INFINITY, color)
            } else {
                let alpha = best_score - ASPIRATION_WINDOW;
                let beta = best_score + ASPIRATION_WINDOW;
                let result = self.search_root(&mut board, hash, depth as i32, alpha, beta, color);
                match result {
                    Some((_, score)) if score <= alpha || score >= beta => {
                        log::trace!(
                            "aspiration miss at depth {}: score {} outside ({}, {})",
                            depth,
                            score,
                            alpha,
                            beta
                        );
                        self.search_root(&mut board, hash, depth as i32, -INFINITY, INFINITY, color)
                    }
                    other => other,
                }
            };

            if self.aborted {
                log::trace!("time limit hit during depth {}, keeping depth {}", depth, completed);
                result = None;
            }
            let (mv, score) = match result {
                Some(found) => found,
                None => break,
            };

            best_move = mv;
            best_score = score;
            completed = depth;
            log::debug!(
                "depth {} score {} nodes {} best {}",
                depth,
                score,
                self.nodes,
                mv
            );

            if self.difficulty.is_timed() && self.timer.is_none() && depth >= self.difficulty.min_depth
            {
                self.timer = Some(Instant::now());
            }
        }

        self.last_search = SearchInfo {
            depth: completed,
            score: best_score,
            nodes: self.nodes,
            null_searches: self.null_searches,
            elapsed: started.elapsed(),
        };
        log::info!(
            "{} plays {} ({}): depth {} score {} nodes {} null {} in {:?}",
            color,
            best_move,
            self.difficulty.label,
            completed,
            best_score,
            self.nodes,
            self.null_searches,
            self.last_search.elapsed
        );

        Some(best_move)
    }

    fn reset(&mut self) {
        self.nodes = 0;
        self.null_searches = 0;
        self.aborted = false;
        self.timer = None;
        self.tt.clear();
        self.killers = [[0; 2]; MAX_PLY];
        for table in self.history.iter_mut() {
            for row in table.iter_mut() {
                row.fill(0);
            }
        }
    }

    #[inline]
    fn time_up(&self) -> bool {
        match (self.timer, self.difficulty.time_limit_ms) {
            (Some(start), Some(limit)) if limit > 0 => {
                start.elapsed() >= Duration::from_millis(limit)
            }
            _ => false,
        }
    }

    /// 节点计数，并按固定间隔检查时间
    #[inline]
    fn check_abort(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        self.nodes += 1;
        if self.nodes & TIME_CHECK_MASK == 0 && self.time_up() {
            self.aborted = true;
        }
        self.aborted
    }

    #[inline]
    fn noise(&mut self) -> i32 {
        let range = self.difficulty.noise_range;
        if range > 0 {
            self.rng.gen_range(-range..=range)
        } else {
            0
        }
    }

    /// 走法排序：置换表走法 > 吃子 (MVV-LVA) > 杀手走法 > 历史分
    fn order_moves(&self, moves: &mut [Move], color: Color, ply: usize, tt_move: u16) {
        let killers = if ply < MAX_PLY {
            self.killers[ply]
        } else {
            [0; 2]
        };
        let history = &self.history[color.index()];

        moves.sort_by_cached_key(|mv| {
            let key = mv.key();
            let score = if tt_move != 0 && key == tt_move {
                TT_MOVE_BONUS
            } else if let Some(victim) = mv.captured {
                CAPTURE_BONUS + victim.piece_type.value() * 10 - mv.piece.piece_type.value()
            } else if key == killers[0] {
                KILLER_BONUS[0]
            } else if key == killers[1] {
                KILLER_BONUS[1]
            } else {
                history[mv.from.to_index()][mv.to.to_index()].min(HISTORY_CAP)
            };
            Reverse(score)
        });
    }

    #[inline]
    fn update_killers(&mut self, mv: &Move, ply: usize) {
        if ply >= MAX_PLY {
            return;
        }
        let key = mv.key();
        if self.killers[ply][0] != key {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = key;
        }
    }

    #[inline]
    fn update_history(&mut self, mv: &Move, depth: i32) {
        let entry =
            &mut self.history[mv.piece.color.index()][mv.from.to_index()][mv.to.to_index()];
        *entry = entry.saturating_add(depth * depth);
    }

    /// 根节点搜索，返回 (最佳走法, 不含噪声的分数)；被中断时返回 None
    fn search_root(
        &mut self,
        board: &mut Board,
        hash: u64,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        color: Color,
    ) -> Option<(Move, i32)> {
        let tt_move = self.tt.probe(hash).map_or(0, |e| e.best_move);
        let mut moves = generate_moves(board, color);
        self.order_moves(&mut moves, color, 0, tt_move);

        let opponent = color.opponent();
        let alpha_orig = alpha;
        // (走法, 分数, 加噪声后的分数)
        let mut best: Option<(Move, i32, i32)> = None;
        // 不含噪声的最高分，写入置换表
        let mut raw_best: Option<(Move, i32)> = None;
        let mut searched = 0;

        for mv in moves {
            board.make_move(&mv);
            if !leaves_legal_position(board, &mv) {
                board.unmake_move(&mv);
                continue;
            }

            let child_hash = next_hash(hash, &mv);
            // 根节点的将军延伸不受上限约束
            let extension = is_in_check(board, opponent) as i32;
            let new_depth = depth - 1 + extension;

            let score = if searched == 0 {
                -self.alpha_beta(board, child_hash, new_depth, -beta, -alpha, opponent, 1, extension, true)
            } else {
                let mut score = -self.alpha_beta(
                    board, child_hash, new_depth, -alpha - 1, -alpha, opponent, 1, extension, true,
                );
                if score > alpha && score < beta {
                    score = -self.alpha_beta(
                        board, child_hash, new_depth, -beta, -alpha, opponent, 1, extension, true,
                    );
                }
                score
            };

            board.unmake_move(&mv);
            if self.aborted {
                return None;
            }
            searched += 1;

            let noisy = score + self.noise();
            if best.map_or(true, |(_, _, best_noisy)| noisy > best_noisy) {
                best = Some((mv, score, noisy));
            }
            if raw_best.map_or(true, |(_, best_raw)| score > best_raw) {
                raw_best = Some((mv, score));
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        let (mv, score, _) = best?;
        let (root_move, root_score) = raw_best.unwrap_or((mv, score));
        let flag = if root_score >= beta {
            TTFlag::LowerBound
        } else if root_score <= alpha_orig {
            TTFlag::UpperBound
        } else {
            TTFlag::Exact
        };
        self.tt.store(hash, depth, root_score, flag, Some(&root_move));
        Some((mv, score))
    }

    /// PVS alpha-beta，每次调用一层
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        hash: u64,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        color: Color,
        ply: usize,
        extensions: i32,
        null_allowed: bool,
    ) -> i32 {
        if self.check_abort() {
            return 0;
        }

        let mut tt_move = 0;
        if let Some(entry) = self.tt.probe(hash) {
            if let Some(score) = entry.cutoff(depth, alpha, beta) {
                return score;
            }
            tt_move = entry.best_move;
        }

        if depth <= 0 {
            return self.quiescence(board, alpha, beta, color, 0);
        }

        let in_check = is_in_check(board, color);
        let opponent = color.opponent();

        // 空着裁剪：连续两步空着不允许
        if null_allowed && !in_check && depth >= NULL_MOVE_MIN_DEPTH {
            self.null_searches += 1;
            let score = -self.alpha_beta(
                board,
                hash ^ zobrist::side_hash(),
                depth - 1 - NULL_MOVE_R,
                -beta,
                -beta + 1,
                opponent,
                ply + 1,
                extensions,
                false,
            );
            if self.aborted {
                return 0;
            }
            if score >= beta {
                return score;
            }
        }

        let mut moves = generate_moves(board, color);
        self.order_moves(&mut moves, color, ply, tt_move);

        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;
        let mut searched = 0;

        for mv in moves {
            board.make_move(&mv);
            if !leaves_legal_position(board, &mv) {
                board.unmake_move(&mv);
                continue;
            }

            let child_hash = next_hash(hash, &mv);
            let gives_check = is_in_check(board, opponent);
            let extension = (gives_check && extensions < MAX_CHECK_EXTENSIONS) as i32;
            let child_extensions = extensions + extension;
            let full_depth = depth - 1 + extension;

            let reduced = searched >= LMR_FULL_DEPTH_MOVES
                && depth >= LMR_MIN_DEPTH
                && !in_check
                && !gives_check
                && !mv.is_capture();

            let score = if searched == 0 {
                -self.alpha_beta(
                    board, child_hash, full_depth, -beta, -alpha, opponent, ply + 1, child_extensions, true,
                )
            } else {
                let search_depth = if reduced { full_depth - 1 } else { full_depth };
                let mut score = -self.alpha_beta(
                    board, child_hash, search_depth, -alpha - 1, -alpha, opponent, ply + 1, child_extensions, true,
                );
                if score > alpha && reduced {
                    score = -self.alpha_beta(
                        board, child_hash, full_depth, -alpha - 1, -alpha, opponent, ply + 1, child_extensions, true,
                    );
                }
                if score > alpha && score < beta {
                    score = -self.alpha_beta(
                        board, child_hash, full_depth, -beta, -alpha, opponent, ply + 1, child_extensions, true,
                    );
                }
                score
            };

            board.unmake_move(&mv);
            if self.aborted {
                return 0;
            }
            searched += 1;

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.tt.store(hash, depth, best_score, TTFlag::LowerBound, Some(&mv));
                if !mv.is_capture() {
                    self.update_killers(&mv, ply);
                    self.update_history(&mv, depth);
                }
                return best_score;
            }
        }

        // 无合法走法：将死与困毙同样判负
        if searched == 0 {
            return -CHECKMATE_SCORE - depth;
        }

        let flag = if best_score > alpha_orig {
            TTFlag::Exact
        } else {
            TTFlag::UpperBound
        };
        self.tt.store(hash, depth, best_score, flag, best_move.as_ref());
        best_score
    }

    /// 静态搜索：只搜吃子
    fn quiescence(&mut self, board: &mut Board, mut alpha: i32, beta: i32, color: Color, qply: i32) -> i32 {
        if self.check_abort() {
            return 0;
        }

        let stand_pat = evaluate(board, color);
        if stand_pat >= beta || qply >= QUIESCENCE_MAX_PLY {
            return stand_pat;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures = generate_capture_moves(board, color);
        self.order_moves(&mut captures, color, MAX_PLY, 0);

        let mut best_score = stand_pat;
        for mv in captures {
            // Delta pruning
            let gain = mv.captured.map_or(0, |p| p.piece_type.value());
            if stand_pat + gain + DELTA_MARGIN < alpha {
                continue;
            }

            board.make_move(&mv);
            if !leaves_legal_position(board, &mv) {
                board.unmake_move(&mv);
                continue;
            }
            let score = -self.quiescence(board, -beta, -alpha, color.opponent(), qply + 1);
            board.unmake_move(&mv);
            if self.aborted {
                return 0;
            }

            if score > best_score {
                best_score = score;
            }
            if score >= beta {
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }

        best_score
    }
}

/// 走法后的增量哈希（含走子方切换）
#[inline]
fn next_hash(hash: u64, mv: &Move) -> u64 {
    let mut h = hash ^ zobrist::piece_hash(mv.piece, mv.from) ^ zobrist::piece_hash(mv.piece, mv.to);
    if let Some(captured) = mv.captured {
        h ^= zobrist::piece_hash(captured, mv.to);
    }
    h ^ zobrist::side_hash()
}
