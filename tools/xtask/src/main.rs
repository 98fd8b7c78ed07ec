//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-core`: 运行 calc-core 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `case-check`: 检查表达式用例文件（`*.calc`）

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use calc_core::{ERROR_DISPLAY, evaluate, format_result};
use serde::Serialize;
use walkdir::WalkDir;
use xshell::{Shell, cmd};

fn ensure_cargo_llvm_cov_available(sh: &Shell) -> anyhow::Result<()> {
    let available = cmd!(sh, "cargo llvm-cov --version")
        .quiet()
        .ignore_stdout()
        .ignore_stderr()
        .run()
        .is_ok();
    if !available {
        anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let sh = Shell::new()?;
            eprintln!("\n==> cargo fmt");
            cmd!(sh, "cargo fmt --all -- --check").run()?;
            eprintln!("\n==> cargo clippy");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;
            eprintln!("\n==> cargo test");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        "cov-core" => {
            let sh = Shell::new()?;
            ensure_cargo_llvm_cov_available(&sh)?;
            cmd!(sh, "cargo llvm-cov -p calc-core --all-features --html").run()?;
            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "cov-workspace" => {
            let sh = Shell::new()?;
            ensure_cargo_llvm_cov_available(&sh)?;
            // 排除 xtask，避免工具代码稀释覆盖率
            cmd!(
                sh,
                "cargo llvm-cov --workspace --exclude xtask --all-features --html"
            )
            .run()?;
            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "case-check" => {
            let mut path = None;
            let mut json = false;
            for arg in args {
                match arg.as_str() {
                    "--json" => json = true,
                    _ => path = Some(arg),
                }
            }
            case_check(path.as_deref(), json)?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-core        运行 calc-core 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  case-check      检查表达式用例文件

CASE-CHECK:
  cargo xtask case-check [path] [--json]

  不带路径：检查 cases/ 下所有 .calc 文件
  带路径参数：检查指定文件或目录
  --json：以 JSON 输出报告到 stdout

  用例格式（每行一个，# 开头为注释）：
    2 + 3 * 4 => 14
    2 +       => Error

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-core      -> cargo xtask cov-core
  cargo cov-workspace -> cargo xtask cov-workspace
  cargo case-check    -> cargo xtask case-check
"#
    );
}

//=============================================================================
// case-check 命令实现
//=============================================================================

/// 默认用例目录（相对于 workspace root）
const DEFAULT_CASES_DIR: &str = "cases";

/// 用例检查报告
#[derive(Debug, Default, Serialize)]
struct CaseReport {
    /// 检查的文件数量
    files_checked: usize,
    /// 检查的用例数量
    cases_checked: usize,
    /// 失败的用例
    failures: Vec<CaseFailure>,
}

/// 失败的用例
#[derive(Debug, Serialize)]
struct CaseFailure {
    file: String,
    line: usize,
    expression: String,
    expected: String,
    actual: String,
}

/// 单行用例
#[derive(Debug, PartialEq)]
struct Case<'a> {
    expression: &'a str,
    expected: &'a str,
}

/// 解析一行用例
///
/// 空行与注释返回 `Ok(None)`，缺少 `=>` 返回错误。
fn parse_case_line(line: &str) -> Result<Option<Case<'_>>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (expression, expected) = trimmed
        .rsplit_once("=>")
        .ok_or_else(|| format!("缺少 '=>': {}", trimmed))?;

    Ok(Some(Case {
        expression: expression.trim(),
        expected: expected.trim(),
    }))
}

/// 按显示屏规则求值：成功为格式化结果，失败为 `Error`
fn display_of(expression: &str) -> String {
    match evaluate(expression) {
        Ok(value) => format_result(value),
        Err(_) => ERROR_DISPLAY.to_string(),
    }
}

/// 执行用例检查
fn case_check(path: Option<&str>, json: bool) -> anyhow::Result<()> {
    let root = PathBuf::from(path.unwrap_or(DEFAULT_CASES_DIR));
    if !root.exists() {
        anyhow::bail!(
            "路径不存在: {}\n请在 workspace 根目录运行，或指定用例路径",
            root.display()
        );
    }

    let files = collect_case_files(&root)?;
    if files.is_empty() {
        eprintln!("未找到用例文件（.calc）");
        return Ok(());
    }

    let mut report = CaseReport::default();
    for file in &files {
        check_case_file(file, &mut report)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.failures.is_empty() {
        anyhow::bail!("用例检查发现 {} 个失败", report.failures.len());
    }
    Ok(())
}

/// 收集所有用例文件
fn collect_case_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "calc") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// 检查单个用例文件
fn check_case_file(file: &Path, report: &mut CaseReport) -> anyhow::Result<()> {
    let file_id = file.display().to_string();
    let content = std::fs::read_to_string(file)?;
    report.files_checked += 1;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let case = match parse_case_line(line) {
            Ok(Some(case)) => case,
            Ok(None) => continue,
            Err(message) => {
                report.failures.push(CaseFailure {
                    file: file_id.clone(),
                    line: line_number,
                    expression: line.trim().to_string(),
                    expected: String::new(),
                    actual: message,
                });
                continue;
            }
        };

        report.cases_checked += 1;
        let actual = display_of(case.expression);
        if actual != case.expected {
            report.failures.push(CaseFailure {
                file: file_id.clone(),
                line: line_number,
                expression: case.expression.to_string(),
                expected: case.expected.to_string(),
                actual,
            });
        }
    }

    Ok(())
}

/// 输出检查结果
fn print_report(report: &CaseReport) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!(
        "检查完成: {} 个文件, {} 个用例",
        report.files_checked, report.cases_checked
    );
    eprintln!();

    for failure in &report.failures {
        eprintln!(
            "[FAIL] {}:{}: {} => 期望 {}，实际 {}",
            failure.file, failure.line, failure.expression, failure.expected, failure.actual
        );
    }

    eprintln!();
    if report.failures.is_empty() {
        eprintln!("✅ 检查通过，无失败");
    } else {
        eprintln!("❌ {} 个失败", report.failures.len());
    }
}
