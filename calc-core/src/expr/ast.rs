//! # AST 模块
//!
//! 算术表达式的抽象语法树。
//!
//! 解析器只负责构建 [`Expr`]，求值由 [`crate::expr::eval`] 完成。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// 加法 `+`
    Add,
    /// 减法 `-`
    Sub,
    /// 乘法 `*`
    Mul,
    /// 除法 `/`
    Div,
    /// 乘方 `^`（右结合）
    Pow,
}

impl BinaryOp {
    /// 运算符在表达式中的书写形式
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }
}

/// 一元符号运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// 正号 `+`
    Plus,
    /// 负号 `-`
    Minus,
}

impl UnaryOp {
    pub fn symbol(self) -> char {
        match self {
            UnaryOp::Plus => '+',
            UnaryOp::Minus => '-',
        }
    }
}

/// 表达式 AST 节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// 数字字面量
    Number(f64),

    /// 一元符号
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// 二元运算
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// 创建数字字面量
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// 创建一元运算
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// 创建二元运算
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// 创建负号
    #[allow(clippy::should_implement_trait)]
    pub fn neg(operand: Expr) -> Self {
        Self::unary(UnaryOp::Minus, operand)
    }

    /// 创建正号
    pub fn pos(operand: Expr) -> Self {
        Self::unary(UnaryOp::Plus, operand)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Add, left, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Sub, left, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn mul(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Mul, left, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn div(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Div, left, right)
    }

    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Self::binary(BinaryOp::Pow, base, exponent)
    }

    /// 树的深度（字面量为 1）
    pub fn depth(&self) -> usize {
        match self {
            Expr::Number(_) => 1,
            Expr::Unary { operand, .. } => 1 + operand.depth(),
            Expr::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// 完全加括号的形式，便于观察结合性
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{}", value),
            Expr::Unary { op, operand } => write!(f, "({}{})", op.symbol(), operand),
            Expr::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parenthesized() {
        let expr = Expr::add(
            Expr::number(2.0),
            Expr::mul(Expr::number(3.0), Expr::number(4.0)),
        );
        insta::assert_snapshot!(expr.to_string(), @"(2 + (3 * 4))");

        let expr = Expr::neg(Expr::pow(Expr::number(2.0), Expr::number(0.5)));
        insta::assert_snapshot!(expr.to_string(), @"(-(2 ^ 0.5))");
    }

    #[test]
    fn test_depth() {
        assert_eq!(Expr::number(1.0).depth(), 1);
        assert_eq!(Expr::neg(Expr::neg(Expr::number(5.0))).depth(), 3);
        assert_eq!(
            Expr::sub(Expr::number(1.0), Expr::div(Expr::number(2.0), Expr::number(3.0))).depth(),
            3
        );
    }

    #[test]
    fn test_expr_serialization() {
        let expr = Expr::pos(Expr::sub(Expr::number(1.5), Expr::number(2.0)));
        let json = serde_json::to_string(&expr).unwrap();
        let deserialized: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(expr, deserialized);
    }
}
