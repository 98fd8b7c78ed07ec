//! 日志初始化
//!
//! 日志统一写到 stderr，stdout 只留给计算结果。

use std::io::IsTerminal;

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;

/// 安装全局 fmt subscriber
///
/// stderr 被重定向时关闭颜色转义。
pub fn init(level: Level) -> anyhow::Result<()> {
    let ansi = std::io::stderr().is_terminal();
    tracing::subscriber::set_global_default(subscriber(level, ansi, std::io::stderr))
        .map_err(|e| anyhow::anyhow!("日志初始化失败: {e}"))
}

/// 构建 fmt subscriber
pub fn subscriber<W>(level: Level, ansi: bool, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(ansi)
        .with_writer(writer)
        .with_target(false)
        .finish()
}

/// 把日志收集到内存，供测试断言
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    /// 在 `level` 级别、无颜色的 subscriber 下执行 `f`
    pub(crate) fn capture<T>(&self, level: Level, f: impl FnOnce() -> T) -> T {
        tracing::subscriber::with_default(subscriber(level, false, self.clone()), f)
    }
}

#[cfg(test)]
impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_has_no_escapes() {
        let logs = CapturedLogs::default();
        logs.capture(Level::INFO, || tracing::warn!(value = 1, "纯文本"));

        let text = logs.contents();
        assert!(text.contains("纯文本"));
        assert!(text.contains("value=1"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_ansi_output_is_colored() {
        let logs = CapturedLogs::default();
        tracing::subscriber::with_default(subscriber(Level::INFO, true, logs.clone()), || {
            tracing::warn!("彩色")
        });
        assert!(logs.contents().contains('\x1b'));
    }

    #[test]
    fn test_level_filter() {
        let logs = CapturedLogs::default();
        logs.capture(Level::WARN, || {
            tracing::debug!("调试");
            tracing::info!("信息");
        });
        assert!(logs.contents().is_empty());
    }
}
