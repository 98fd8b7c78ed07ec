//! # Calc Core
//!
//! 科学计算器的核心库。
//!
//! ## 架构概述
//!
//! `calc-core` 是纯逻辑核心，不依赖任何 IO 或界面。
//! 宿主层（Host）把按键转换为 [`Key`]，交给 [`Calculator`]，再把显示屏文本渲染出来：
//!
//! ```text
//! Host                          Calculator
//!   │                              │
//!   │──── Key ───────────────────►│
//!   │                              │ press()
//!   │◄─── display: &str ──────────│
//!   │                              │
//! ```
//!
//! `=` 按键背后是一个独立的表达式求值器，也可以直接调用：
//!
//! ```ignore
//! use calc_core::evaluate;
//!
//! assert_eq!(evaluate("2 + 3 * 4")?, 14.0);
//! assert_eq!(evaluate("2 ^ 3 ^ 2")?, 512.0);
//! ```
//!
//! ## 模块结构
//!
//! - [`expr`]：表达式 AST、解析器、求值器
//! - [`error`]：错误类型定义
//! - [`format`]：结果格式化
//! - [`functions`]：科学函数与常量
//! - [`input`]：按键定义
//! - [`state`]：计算器状态
//! - [`calculator`]：按键状态机

pub mod calculator;
pub mod error;
pub mod expr;
pub mod format;
pub mod functions;
pub mod input;
pub mod state;

// 重导出核心类型
pub use calculator::{Calculator, ERROR_DISPLAY};
pub use error::{EvalError, EvalResult, Lookahead};
pub use expr::{BinaryOp, Expr, MAX_NESTING_DEPTH, UnaryOp, eval, evaluate, parse_expression};
pub use format::format_result;
pub use functions::{Constant, Function, factorial};
pub use input::{Key, MemoryOp, Operator};
pub use state::{AngleMode, CalculatorState};
