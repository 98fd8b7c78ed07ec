//! # Expr 模块
//!
//! 算术表达式的解析与求值。
//!
//! ## 模块结构
//!
//! - [`ast`]：表达式树定义
//! - [`parser`]：递归下降解析器
//! - [`eval`]：表达式树求值

pub mod ast;
pub mod eval;
pub mod parser;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use eval::{eval, evaluate};
pub use parser::{MAX_NESTING_DEPTH, parse_expression};
