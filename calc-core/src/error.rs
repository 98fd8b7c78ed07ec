//! # Error 模块
//!
//! 定义 calc-core 中使用的错误类型。

use std::fmt;

use thiserror::Error;

/// 求值失败时光标所看到的内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    /// 一个具体字符
    Char(char),
    /// 输入已结束
    End,
}

impl fmt::Display for Lookahead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookahead::Char(c) => write!(f, "字符 '{}'", c),
            Lookahead::End => write!(f, "输入结束"),
        }
    }
}

impl From<Option<char>> for Lookahead {
    fn from(c: Option<char>) -> Self {
        c.map_or(Lookahead::End, Lookahead::Char)
    }
}

/// 表达式求值错误
///
/// `position` 为输入中的字节偏移。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// 语法要求数字或特定符号，实际遇到了别的内容
    #[error("位置 {position}：意外的{found}")]
    UnexpectedCharacter { found: Lookahead, position: usize },

    /// 顶层表达式解析完成，但输入未被完全消费
    #[error("位置 {position}：表达式末尾存在无法解析的内容 '{found}'")]
    TrailingInput { found: char, position: usize },

    /// 一元符号、乘方或运算链的嵌套层数超过上限
    #[error("位置 {position}：表达式嵌套超过 {limit} 层")]
    NestingTooDeep { position: usize, limit: usize },
}

impl EvalError {
    /// 出错位置（字节偏移）
    pub fn position(&self) -> usize {
        match self {
            EvalError::UnexpectedCharacter { position, .. }
            | EvalError::TrailingInput { position, .. }
            | EvalError::NestingTooDeep { position, .. } => *position,
        }
    }
}

/// Result 类型别名
pub type EvalResult<T> = Result<T, EvalError>;
