//! 置换表（数组实现）
//!
//! 固定大小、2 的幂，按 `hash & (TT_SIZE - 1)` 定位；写入总是覆盖原有条目。

use crate::types::Move;

pub const TT_SIZE: usize = 1 << 20;
const TT_MASK: usize = TT_SIZE - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TTFlag {
    None = 0,
    Exact = 1,
    LowerBound = 2,
    UpperBound = 3,
}

#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    pub hash: u64,
    pub score: i32,
    pub depth: i8,
    pub flag: TTFlag,
    /// [`Move::key`]，0 表示没有
    pub best_move: u16,
}

impl Default for TTEntry {
    fn default() -> Self {
        TTEntry {
            hash: 0,
            score: 0,
            depth: -1,
            flag: TTFlag::None,
            best_move: 0,
        }
    }
}

impl TTEntry {
    /// 条目能否直接给出当前窗口下的分数
    #[inline]
    pub fn cutoff(&self, depth: i32, alpha: i32, beta: i32) -> Option<i32> {
        if (self.depth as i32) < depth {
            return None;
        }
        match self.flag {
            TTFlag::Exact => Some(self.score),
            TTFlag::LowerBound if self.score >= beta => Some(self.score),
            TTFlag::UpperBound if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }
}

pub struct TranspositionTable {
    entries: Vec<TTEntry>,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new()
    }
}

impl TranspositionTable {
    pub fn new() -> Self {
        TranspositionTable {
            entries: vec![TTEntry::default(); TT_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.entries.fill(TTEntry::default());
    }

    #[inline]
    pub fn probe(&self, hash: u64) -> Option<&TTEntry> {
        let entry = &self.entries[(hash as usize) & TT_MASK];
        if entry.flag != TTFlag::None && entry.hash == hash {
            Some(entry)
        } else {
            None
        }
    }

    #[inline]
    pub fn store(&mut self, hash: u64, depth: i32, score: i32, flag: TTFlag, best_move: Option<&Move>) {
        self.entries[(hash as usize) & TT_MASK] = TTEntry {
            hash,
            score,
            depth: depth.clamp(i8::MIN as i32, i8::MAX as i32) as i8,
            flag,
            best_move: best_move.map_or(0, Move::key),
        };
    }
}
