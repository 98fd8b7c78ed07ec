//! # Input 模块
//!
//! 定义宿主层向计算器传递的按键输入。
//!
//! ## 设计说明
//!
//! - `Key` 是宿主采集用户操作后传递给 [`Calculator`](crate::Calculator) 的语义化输入
//! - 计算器不关心按钮、窗口或键盘事件，只处理 `Key`
//! - 宿主可以用 [`Key::from_label`] 把按钮文字直接映射为 `Key`

use serde::{Deserialize, Serialize};

use crate::functions::{Constant, Function};

/// 二元运算符按键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    /// 写入表达式时使用的符号（`×`、`÷` 统一为 `*`、`/`）
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
        }
    }
}

/// 存储器按键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryOp {
    /// `MC`
    Clear,
    /// `MR`
    Recall,
    /// `M+`
    Add,
    /// `M-`
    Subtract,
}

/// 计算器按键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// 数字 0-9
    Digit(u8),
    /// 小数点
    Dot,
    Operator(Operator),
    Function(Function),
    Constant(Constant),
    Memory(MemoryOp),
    /// `C`：清屏
    Clear,
    /// `⌫`：删除最后一个字符
    Delete,
    /// `=`
    Equals,
    /// `RAD` / `DEG` 切换
    ToggleAngle,
}

impl Key {
    /// 创建数字按键，超出 0-9 返回 `None`
    pub fn digit(d: u8) -> Option<Self> {
        (d <= 9).then_some(Self::Digit(d))
    }

    /// 从按钮标签解析按键
    ///
    /// 同时接受按钮上的符号（`×`、`÷`、`√`）和便于键盘输入的别名（`*`、`/`、`sqrt`）。
    pub fn from_label(label: &str) -> Option<Self> {
        let key = match label {
            "." => Key::Dot,
            "+" => Key::Operator(Operator::Add),
            "-" => Key::Operator(Operator::Sub),
            "×" | "*" | "x" => Key::Operator(Operator::Mul),
            "÷" | "/" => Key::Operator(Operator::Div),
            "^" => Key::Operator(Operator::Pow),
            "sin" => Key::Function(Function::Sin),
            "cos" => Key::Function(Function::Cos),
            "tan" => Key::Function(Function::Tan),
            "log" => Key::Function(Function::Log),
            "ln" => Key::Function(Function::Ln),
            "√" | "sqrt" => Key::Function(Function::Sqrt),
            "x²" | "x^2" | "sqr" => Key::Function(Function::Square),
            "1/x" => Key::Function(Function::Reciprocal),
            "x!" | "!" => Key::Function(Function::Factorial),
            "±" | "+/-" | "neg" => Key::Function(Function::Negate),
            "%" => Key::Function(Function::Percent),
            "π" | "pi" => Key::Constant(Constant::Pi),
            "e" => Key::Constant(Constant::E),
            "MC" => Key::Memory(MemoryOp::Clear),
            "MR" => Key::Memory(MemoryOp::Recall),
            "M+" => Key::Memory(MemoryOp::Add),
            "M-" => Key::Memory(MemoryOp::Subtract),
            "C" | "AC" => Key::Clear,
            "⌫" | "DEL" | "del" => Key::Delete,
            "=" => Key::Equals,
            "RAD" | "DEG" | "rad" | "deg" => Key::ToggleAngle,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Key::Digit(c as u8 - b'0'),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// 按键标签
    pub fn label(self) -> String {
        match self {
            Key::Digit(d) => d.to_string(),
            Key::Dot => ".".to_string(),
            Key::Operator(Operator::Mul) => "×".to_string(),
            Key::Operator(Operator::Div) => "÷".to_string(),
            Key::Operator(op) => op.symbol().to_string(),
            Key::Function(func) => func.label().to_string(),
            Key::Constant(constant) => constant.label().to_string(),
            Key::Memory(MemoryOp::Clear) => "MC".to_string(),
            Key::Memory(MemoryOp::Recall) => "MR".to_string(),
            Key::Memory(MemoryOp::Add) => "M+".to_string(),
            Key::Memory(MemoryOp::Subtract) => "M-".to_string(),
            Key::Clear => "C".to_string(),
            Key::Delete => "⌫".to_string(),
            Key::Equals => "=".to_string(),
            Key::ToggleAngle => "RAD/DEG".to_string(),
        }
    }
}
