//! Xiangqi Engine CLI
//!
//! 命令行界面，用于测试规则和 AI
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 通信（每行一个 JSON）

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use xiangqi_engine::{
    evaluate, generate_legal_moves, generate_legal_moves_from, get_game_status, parse_fen,
    AiDifficulty, AiEngine, Color, Move, Position,
};

#[derive(Parser)]
#[command(name = "xiangqi-engine")]
#[command(about = "Xiangqi rules engine and AI opponent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取合法走法
    Moves {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// 只列出该格棋子的走法（ICCS 坐标，如 h2）
        #[arg(long)]
        from: Option<String>,
    },

    /// 选择最佳走法
    Best {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// 难度 (beginner, easy, medium, hard, expert, master)
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数（走棋方视角）
    Eval {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 对局状态
    Status {
        /// FEN 字符串
        #[arg(long)]
        fen: String,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    fen: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    mv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<String>>,
    // eval 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    eval: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    // status 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn success_best(mv: Option<String>, score: i32, depth: u32, nodes: u64, elapsed_secs: f64) -> Self {
        Self {
            ok: true,
            mv,
            score: Some(score),
            depth: Some(depth),
            nodes: Some(nodes),
            nps: Some(calc_nps(nodes, elapsed_secs)),
            elapsed_ms: Some(elapsed_secs * 1000.0),
            ..Default::default()
        }
    }

    fn success_legal_moves(legal_moves: Vec<String>) -> Self {
        Self {
            ok: true,
            legal_moves: Some(legal_moves),
            ..Default::default()
        }
    }

    fn success_eval(eval_score: i32, color: Color) -> Self {
        Self {
            ok: true,
            eval: Some(eval_score),
            color: Some(color_to_str(color).to_string()),
            ..Default::default()
        }
    }

    fn success_status(status: String) -> Self {
        Self {
            ok: true,
            status: Some(status),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn color_to_str(color: Color) -> &'static str {
    if color == Color::Red { "red" } else { "black" }
}

fn calc_nps(nodes: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 { nodes as f64 / elapsed_secs } else { 0.0 }
}

/// eval 命令的 JSON 输出
#[derive(Serialize)]
struct EvalOutput<'a> {
    fen: &'a str,
    color: &'static str,
    score: i32,
}

fn eval_json(fen: &str, turn: Color, score: i32) -> serde_json::Result<String> {
    serde_json::to_string(&EvalOutput {
        fen,
        color: color_to_str(turn),
        score,
    })
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

/// 列出合法走法，`from` 为空时列出走棋方全部走法
fn legal_moves(fen: &str, from: Option<&str>) -> Result<Vec<Move>, String> {
    let (board, turn) = parse_fen(fen).map_err(|e| e.to_string())?;
    match from {
        Some(square) => {
            let pos = Position::from_iccs(square).ok_or_else(|| format!("Invalid square: {}", square))?;
            Ok(generate_legal_moves_from(&board, pos))
        }
        None => Ok(generate_legal_moves(&board, turn)),
    }
}

fn build_engine(difficulty: &str, seed: Option<u64>) -> Result<AiEngine, String> {
    let difficulty = AiDifficulty::from_label(difficulty).map_err(|e| e.to_string())?;
    Ok(match seed {
        Some(seed) => AiEngine::with_seed(difficulty, seed),
        None => AiEngine::new(difficulty),
    })
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fen, from } => match legal_moves(&fen, from.as_deref()) {
            Ok(moves) => {
                println!("Legal moves ({}):", moves.len());
                for mv in &moves {
                    println!("  {}", mv);
                }
            }
            Err(e) => fail(e),
        },

        Commands::Best {
            fen,
            difficulty,
            seed,
            json,
        } => {
            let (board, turn) = parse_fen(&fen).unwrap_or_else(|e| fail(e));
            let mut engine = build_engine(&difficulty, seed).unwrap_or_else(|e| fail(e));

            let best = engine.find_best_move(&board, turn);
            let info = engine.last_search();
            let elapsed = info.elapsed.as_secs_f64();

            if json {
                let response = ServerResponse::success_best(
                    best.map(|mv| mv.to_string()),
                    info.score,
                    info.depth,
                    info.nodes,
                    elapsed,
                );
                match serde_json::to_string_pretty(&response) {
                    Ok(s) => println!("{}", s),
                    Err(e) => fail(e),
                }
            } else {
                match best {
                    Some(mv) => println!(
                        "Best move (difficulty={}): {} (score: {})",
                        engine.difficulty().label,
                        mv,
                        info.score
                    ),
                    None => println!("No legal moves for {}", color_to_str(turn)),
                }
                println!(
                    "\nStats: depth={}, nodes={}, time={:.3}s, nps={:.0}",
                    info.depth,
                    info.nodes,
                    elapsed,
                    calc_nps(info.nodes, elapsed)
                );
            }
        }

        Commands::Eval { fen, json } => {
            let (board, turn) = parse_fen(&fen).unwrap_or_else(|e| fail(e));
            let score = evaluate(&board, turn);

            if json {
                match eval_json(&fen, turn, score) {
                    Ok(s) => println!("{}", s),
                    Err(e) => fail(e),
                }
            } else {
                let color_cn = if turn == Color::Red { "红方" } else { "黑方" };
                println!("局面评估 ({} 视角): {}", color_cn, score);
            }
        }

        Commands::Status { fen } => {
            let (board, turn) = parse_fen(&fen).unwrap_or_else(|e| fail(e));
            println!("{}", get_game_status(&board, turn));
        }

        Commands::Server => {
            run_server();
        }
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ServerRequest>(&line) {
            Ok(request) => match request.cmd.as_str() {
                "best" => handle_best_request(&request),
                "moves" => handle_moves_request(&request),
                "eval" => handle_eval_request(&request),
                "status" => handle_status_request(&request),
                "quit" => break,
                _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
            },
            Err(e) => ServerResponse::error(&format!("Invalid JSON: {}", e)),
        };

        match serde_json::to_string(&response) {
            Ok(s) => println!("{}", s),
            Err(e) => log::error!("failed to encode response: {}", e),
        }
        let _ = stdout.flush();
    }
}

/// 处理 best 命令
fn handle_best_request(request: &ServerRequest) -> ServerResponse {
    let (board, turn) = match parse_fen(&request.fen) {
        Ok(parsed) => parsed,
        Err(e) => return ServerResponse::error(&e.to_string()),
    };
    let difficulty = request.difficulty.as_deref().unwrap_or("medium");
    let mut engine = match build_engine(difficulty, request.seed) {
        Ok(engine) => engine,
        Err(e) => return ServerResponse::error(&e),
    };

    let best = engine.find_best_move(&board, turn);
    let info = engine.last_search();
    ServerResponse::success_best(
        best.map(|mv| mv.to_string()),
        info.score,
        info.depth,
        info.nodes,
        info.elapsed.as_secs_f64(),
    )
}

/// 处理 moves 命令
fn handle_moves_request(request: &ServerRequest) -> ServerResponse {
    match legal_moves(&request.fen, request.from.as_deref()) {
        Ok(moves) => ServerResponse::success_legal_moves(moves.iter().map(Move::to_string).collect()),
        Err(e) => ServerResponse::error(&e),
    }
}

/// 处理 eval 命令
fn handle_eval_request(request: &ServerRequest) -> ServerResponse {
    match parse_fen(&request.fen) {
        Ok((board, turn)) => ServerResponse::success_eval(evaluate(&board, turn), turn),
        Err(e) => ServerResponse::error(&e.to_string()),
    }
}

/// 处理 status 命令
fn handle_status_request(request: &ServerRequest) -> ServerResponse {
    match parse_fen(&request.fen) {
        Ok((board, turn)) => ServerResponse::success_status(get_game_status(&board, turn).to_string()),
        Err(e) => ServerResponse::error(&e.to_string()),
    }
}
