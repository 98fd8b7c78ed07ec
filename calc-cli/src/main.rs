//! # calc
//!
//! 科学计算器命令行宿主，驱动 calc-core。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p calc-cli -- eval "2 + 3 * 4"
//! cargo run -p calc-cli -- eval --ast -- -2 ^ 2
//! cargo run -p calc-cli -- repl
//! cargo run -p calc-cli -- keys 2 + 3 × 4 =
//! cargo run -p calc-cli -- --angle deg keys --trace 9 0 sin
//! cargo run -p calc-cli -- --config calc.json init-config
//! ```

mod commands;
mod config;
mod logging;

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use calc_core::AngleMode;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

use commands::{EvalOptions, run_eval, run_init_config, run_keys, run_repl};
use config::{CliConfig, ConfigError, parse_log_level};

#[derive(Parser)]
#[command(name = "calc")]
#[command(about = "科学计算器 - 表达式求值、REPL 与按键回放")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件（默认：calc.json，不存在时使用默认配置）
    #[arg(short, long, default_value = "calc.json", global = true)]
    config: PathBuf,

    /// 日志级别，覆盖配置文件
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 初始角度模式，覆盖配置文件
    #[arg(long, value_enum, global = true)]
    angle: Option<AngleArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// 求值表达式，多个参数以空格拼接
    Eval {
        /// 输出 AST（JSON）
        #[arg(long)]
        ast: bool,

        /// 失败时把错误详情输出到 stderr
        #[arg(short, long)]
        verbose: bool,

        /// 表达式
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true, trailing_var_arg = true)]
        expression: Vec<String>,
    },

    /// 从 stdin 逐行求值
    Repl,

    /// 回放按键序列，输出最终显示屏
    Keys {
        /// 每次按键后输出显示屏
        #[arg(long)]
        trace: bool,

        /// 最后输出状态（JSON）
        #[arg(long)]
        state: bool,

        /// 按键标签，如 `7 × 6 =`、`π`、`M+`
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        labels: Vec<String>,
    },

    /// 把当前生效的配置写入 --config 指定的文件
    InitConfig {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AngleArg {
    Rad,
    Deg,
}

impl From<AngleArg> for AngleMode {
    fn from(arg: AngleArg) -> Self {
        match arg {
            AngleArg::Rad => AngleMode::Rad,
            AngleArg::Deg => AngleMode::Deg,
        }
    }
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("calc error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 日志级别依赖配置文件，先加载配置，日志初始化后再报告加载结果
    let loaded = CliConfig::load(&cli.config);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => CliConfig::default(),
    };

    let level_name = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let level = parse_log_level(level_name).context("--log-level")?;
    logging::init(level)?;

    match loaded {
        Ok(_) => info!(path = %cli.config.display(), "配置文件加载成功"),
        Err(ConfigError::NotFound(path)) => {
            debug!(path = %path.display(), "配置文件不存在，使用默认配置")
        }
        Err(e) => warn!(error = %e, "配置文件无效，使用默认配置"),
    }

    let angle_mode = cli.angle.map(AngleMode::from).unwrap_or(config.angle_mode);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Eval {
            ast,
            verbose,
            expression,
        } => {
            let expression = expression.join(" ");
            let failure = run_eval(&expression, EvalOptions { ast }, &mut out)?;
            if let Some(e) = failure {
                if verbose {
                    eprintln!("{e}");
                }
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Repl => {
            let stdin = std::io::stdin();
            let prompt = stdin
                .is_terminal()
                .then_some(config.repl_prompt.as_str());
            run_repl(stdin.lock(), &mut out, prompt)?;
        }
        Commands::Keys {
            trace,
            state,
            labels,
        } => {
            let final_state = run_keys(&labels, angle_mode, trace, &mut out)?;
            if state {
                let json =
                    serde_json::to_string_pretty(&final_state).context("状态序列化失败")?;
                writeln!(out, "{}", json)?;
            }
        }
        Commands::InitConfig { force } => {
            run_init_config(&cli.config, &config, force, &mut out)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
