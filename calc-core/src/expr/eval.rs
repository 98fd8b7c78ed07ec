//! # 求值器
//!
//! 对 [`Expr`] 求值。求值是纯函数，除零、负数开偶次方等情况按 IEEE-754 传播
//! `Infinity`/`NaN`，不视为错误。

use crate::error::EvalResult;
use crate::expr::ast::{BinaryOp, Expr, UnaryOp};
use crate::expr::parser::parse_expression;

/// 对表达式树求值
pub fn eval(expr: &Expr) -> f64 {
    match expr {
        Expr::Number(value) => *value,

        Expr::Unary { op, operand } => {
            let value = eval(operand);
            match op {
                UnaryOp::Plus => value,
                UnaryOp::Minus => -value,
            }
        }

        Expr::Binary { op, left, right } => {
            let left = eval(left);
            let right = eval(right);
            match op {
                BinaryOp::Add => left + right,
                BinaryOp::Sub => left - right,
                BinaryOp::Mul => left * right,
                BinaryOp::Div => left / right,
                BinaryOp::Pow => left.powf(right),
            }
        }
    }
}

/// 解析并求值表达式字符串
///
/// # 返回
///
/// 求值结果，可能是 `Infinity` 或 `NaN`；语法错误返回 [`crate::EvalError`]。
pub fn evaluate(expression: &str) -> EvalResult<f64> {
    let expr = parse_expression(expression)?;
    Ok(eval(&expr))
}
