//! 子命令实现
//!
//! 所有输出都写入调用方提供的 writer，便于测试。

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Context;
use calc_core::{
    AngleMode, Calculator, CalculatorState, ERROR_DISPLAY, EvalError, Key, eval, evaluate,
    format_result, parse_expression,
};
use tracing::{debug, info};

use crate::config::CliConfig;

/// `eval` 子命令选项
#[derive(Debug, Default, Clone, Copy)]
pub struct EvalOptions {
    /// 在结果之前输出 AST（JSON）
    pub ast: bool,
}

/// 求值单个表达式
///
/// 成功输出格式化结果；失败输出 `Error` 并返回错误详情，是否打印详情由调用方决定。
pub fn run_eval(
    expression: &str,
    options: EvalOptions,
    out: &mut impl Write,
) -> anyhow::Result<Option<EvalError>> {
    debug!(expression, "求值");

    let expr = match parse_expression(expression) {
        Ok(expr) => expr,
        Err(e) => {
            debug!(error = %e, expression, "表达式求值失败");
            writeln!(out, "{}", ERROR_DISPLAY)?;
            return Ok(Some(e));
        }
    };

    if options.ast {
        let json = serde_json::to_string_pretty(&expr).context("AST 序列化失败")?;
        writeln!(out, "{}", json)?;
    }

    let value = eval(&expr);
    debug!(value, depth = expr.depth(), "求值完成");
    writeln!(out, "{}", format_result(value))?;
    Ok(None)
}

/// 逐行求值，返回失败的行数
///
/// 空行跳过，`exit` / `quit` 结束。
pub fn run_repl(
    input: impl BufRead,
    out: &mut impl Write,
    prompt: Option<&str>,
) -> anyhow::Result<usize> {
    let mut failures = 0;
    let mut evaluated = 0;

    write_prompt(out, prompt)?;
    for line in input.lines() {
        let line = line.context("读取输入失败")?;
        let trimmed = line.trim();

        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        if !trimmed.is_empty() {
            evaluated += 1;
            match evaluate(&line) {
                Ok(value) => writeln!(out, "{}", format_result(value))?,
                Err(e) => {
                    failures += 1;
                    debug!(error = %e, line = %line, "REPL 求值失败");
                    writeln!(out, "{}: {}", ERROR_DISPLAY, e)?;
                }
            }
        }

        write_prompt(out, prompt)?;
    }

    info!(evaluated, failures, "REPL 结束");
    Ok(failures)
}

fn write_prompt(out: &mut impl Write, prompt: Option<&str>) -> anyhow::Result<()> {
    if let Some(prompt) = prompt {
        write!(out, "{}", prompt)?;
        out.flush()?;
    }
    Ok(())
}

/// 按键回放，输出最终显示屏并返回最终状态
///
/// `trace` 为真时在每次按键后输出一行 `标签 │ 角度模式 │ 显示屏`。
pub fn run_keys(
    labels: &[String],
    angle_mode: AngleMode,
    trace: bool,
    out: &mut impl Write,
) -> anyhow::Result<CalculatorState> {
    let keys = labels
        .iter()
        .map(|label| Key::from_label(label).with_context(|| format!("未知按键: '{}'", label)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut calc = Calculator::new(angle_mode);
    for key in keys {
        calc.press(key);
        if trace {
            writeln!(
                out,
                "{:>7} │ {} │ {}",
                key.label(),
                calc.state().angle_mode.label(),
                calc.display()
            )?;
        }
    }

    debug!(keys = labels.len(), display = calc.display(), "按键回放完成");
    writeln!(out, "{}", calc.display())?;
    Ok(calc.state().clone())
}

/// 把配置写入 `path`
///
/// 文件已存在且未指定 `force` 时拒绝覆盖。
pub fn run_init_config(
    path: &Path,
    config: &CliConfig,
    force: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
    }
    config.save(path)?;
    info!(path = %path.display(), "配置文件已写入");
    writeln!(out, "{}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::CapturedLogs;
    use tracing::Level;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    fn labels(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_eval_success() {
        let mut out = Vec::new();
        let err = run_eval("2 + 3 * 4", EvalOptions::default(), &mut out).unwrap();
        assert!(err.is_none());
        assert_eq!(output(out), "14\n");
    }

    #[test]
    fn test_eval_failure() {
        let mut out = Vec::new();
        let err = run_eval("2 +", EvalOptions::default(), &mut out).unwrap();
        assert!(matches!(err, Some(EvalError::UnexpectedCharacter { .. })));
        assert_eq!(output(out), "Error\n");
    }

    #[test]
    fn test_eval_failure_is_quiet_at_default_level() {
        let logs = CapturedLogs::default();
        let mut out = Vec::new();
        let err = logs
            .capture(Level::WARN, || {
                run_eval("1.2.3", EvalOptions::default(), &mut out)
            })
            .unwrap();
        assert!(err.is_some());
        assert_eq!(output(out), "Error\n");
        assert!(logs.contents().is_empty());
    }

    #[test]
    fn test_eval_failure_logged_at_debug() {
        let logs = CapturedLogs::default();
        let mut out = Vec::new();
        logs.capture(Level::DEBUG, || {
            run_eval("1.2.3", EvalOptions::default(), &mut out)
        })
        .unwrap();
        let text = logs.contents();
        assert!(text.contains("表达式求值失败"));
        assert!(text.contains("位置 3"));
    }

    #[test]
    fn test_eval_with_ast() {
        let mut out = Vec::new();
        run_eval("-1", EvalOptions { ast: true }, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("\"Unary\""));
        assert!(text.ends_with("-1\n"));
    }

    #[test]
    fn test_repl() {
        let input = "1 + 1\n\n2 ^ 10\n1 +\n0/0\nquit\n3\n";
        let mut out = Vec::new();
        let failures = run_repl(input.as_bytes(), &mut out, None).unwrap();
        assert_eq!(failures, 1);

        let text = output(out);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "1024");
        assert!(lines[2].starts_with("Error: "));
        assert_eq!(lines[3], "NaN");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_repl_prompt() {
        let mut out = Vec::new();
        run_repl("7\n".as_bytes(), &mut out, Some("> ")).unwrap();
        assert_eq!(output(out), "> 7\n> ");
    }

    #[test]
    fn test_keys() {
        let mut out = Vec::new();
        let state = run_keys(&labels("2 + 3 × 4 ="), AngleMode::Rad, false, &mut out).unwrap();
        assert_eq!(output(out), "14\n");
        assert_eq!(state.display, "14");
        assert!(state.start_new_number);
    }

    #[test]
    fn test_keys_trace() {
        let mut out = Vec::new();
        run_keys(&labels("9 0 sin"), AngleMode::Deg, true, &mut out).unwrap();
        let text = output(out);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].ends_with("│ DEG │ 1"));
        assert_eq!(lines[3], "1");
    }

    #[test]
    fn test_keys_trace_shows_angle_toggle() {
        let mut out = Vec::new();
        run_keys(&labels("1 DEG"), AngleMode::Rad, true, &mut out).unwrap();
        let text = output(out);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].ends_with("│ RAD │ 1"));
        assert!(lines[1].ends_with("│ DEG │ 1"));
    }

    #[test]
    fn test_keys_unknown_label() {
        let mut out = Vec::new();
        let err = run_keys(&labels("2 ? 3"), AngleMode::Rad, false, &mut out).unwrap_err();
        assert!(err.to_string().contains('?'));
        assert!(out.is_empty());
    }

    #[test]
    fn test_init_config_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.json");
        let mut out = Vec::new();

        run_init_config(&path, &CliConfig::default(), false, &mut out).unwrap();

        assert_eq!(CliConfig::load(&path).unwrap(), CliConfig::default());
        assert_eq!(output(out), format!("{}\n", path.display()));
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.json");
        std::fs::write(&path, "{ \"log_level\": \"info\" }").unwrap();
        let mut out = Vec::new();

        let err = run_init_config(&path, &CliConfig::default(), false, &mut out).unwrap_err();

        assert!(err.to_string().contains("--force"));
        assert!(out.is_empty());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{ \"log_level\": \"info\" }"
        );
    }

    #[test]
    fn test_init_config_force_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = CliConfig {
            angle_mode: AngleMode::Deg,
            ..CliConfig::default()
        };
        let mut out = Vec::new();

        run_init_config(&path, &config, true, &mut out).unwrap();

        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }
}
