//! AI 难度配置

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 难度
///
/// 没有时间限制的难度按固定深度搜索；有时间限制的难度在达到
/// `min_depth` 之后才开始计时，之后迭代加深直到时间用完或到达 `depth`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDifficulty {
    pub label: String,
    /// 最大搜索深度
    pub depth: u32,
    /// 根节点每个走法分数上叠加的均匀噪声幅度
    #[serde(default)]
    pub noise_range: i32,
    /// 时间限制（毫秒）
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
    /// 计时开始前必须完成的深度
    #[serde(default = "default_min_depth")]
    pub min_depth: u32,
}

fn default_min_depth() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DifficultyError {
    #[error("unknown difficulty: {0}")]
    Unknown(String),
}

/// 预设难度名称
pub const AVAILABLE_DIFFICULTIES: [&str; 6] =
    ["beginner", "easy", "medium", "hard", "expert", "master"];

impl AiDifficulty {
    pub fn new(label: &str, depth: u32, noise_range: i32) -> Self {
        AiDifficulty {
            label: label.to_string(),
            depth,
            noise_range,
            time_limit_ms: None,
            min_depth: depth,
        }
    }

    /// 增加时间限制
    pub fn with_time_limit(mut self, time_limit_ms: u64, min_depth: u32) -> Self {
        self.time_limit_ms = Some(time_limit_ms);
        self.min_depth = min_depth;
        self
    }

    pub fn beginner() -> Self {
        AiDifficulty::new("beginner", 1, 150)
    }

    pub fn easy() -> Self {
        AiDifficulty::new("easy", 2, 80)
    }

    pub fn medium() -> Self {
        AiDifficulty::new("medium", 3, 30)
    }

    pub fn hard() -> Self {
        AiDifficulty::new("hard", 4, 0)
    }

    pub fn expert() -> Self {
        AiDifficulty::new("expert", 8, 0).with_time_limit(3000, 4)
    }

    pub fn master() -> Self {
        AiDifficulty::new("master", 12, 0).with_time_limit(6000, 5)
    }

    /// 按名称查找预设难度（大小写不敏感）
    pub fn from_label(label: &str) -> Result<Self, DifficultyError> {
        match label.to_lowercase().as_str() {
            "beginner" => Ok(Self::beginner()),
            "easy" => Ok(Self::easy()),
            "medium" => Ok(Self::medium()),
            "hard" => Ok(Self::hard()),
            "expert" => Ok(Self::expert()),
            "master" => Ok(Self::master()),
            _ => Err(DifficultyError::Unknown(label.to_string())),
        }
    }

    /// 计时是否启用
    #[inline]
    pub fn is_timed(&self) -> bool {
        self.time_limit_ms.map_or(false, |ms| ms > 0)
    }
}

impl Default for AiDifficulty {
    fn default() -> Self {
        AiDifficulty::medium()
    }
}
