//! # Functions 模块
//!
//! 作用于显示屏当前数值的科学函数与常量。
//!
//! 定义域之外的输入（如 `ln(-1)`、`√-1`）返回 `NaN`，不视为错误。

use serde::{Deserialize, Serialize};

use crate::state::AngleMode;

/// 单参数科学函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    /// 以 10 为底的对数
    Log,
    /// 自然对数
    Ln,
    /// 平方根 `√`
    Sqrt,
    /// 平方 `x²`
    Square,
    /// 倒数 `1/x`
    Reciprocal,
    /// 阶乘 `x!`
    Factorial,
    /// 取反 `±`
    Negate,
    /// 百分比 `%`
    Percent,
}

impl Function {
    /// 按键标签
    pub fn label(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Log => "log",
            Function::Ln => "ln",
            Function::Sqrt => "√",
            Function::Square => "x²",
            Function::Reciprocal => "1/x",
            Function::Factorial => "x!",
            Function::Negate => "±",
            Function::Percent => "%",
        }
    }

    /// 对数值应用函数
    ///
    /// 三角函数在 [`AngleMode::Deg`] 下先把参数换算为弧度。
    pub fn apply(self, value: f64, angle_mode: AngleMode) -> f64 {
        match self {
            Function::Sin => angle_mode.to_radians(value).sin(),
            Function::Cos => angle_mode.to_radians(value).cos(),
            Function::Tan => angle_mode.to_radians(value).tan(),
            Function::Log => value.log10(),
            Function::Ln => value.ln(),
            Function::Sqrt => value.sqrt(),
            Function::Square => value.powi(2),
            Function::Reciprocal => 1.0 / value,
            Function::Factorial => factorial(value),
            Function::Negate => -value,
            Function::Percent => value / 100.0,
        }
    }
}

/// 数学常量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constant {
    /// 圆周率 `π`
    Pi,
    /// 自然常数 `e`
    E,
}

impl Constant {
    pub fn label(self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::E => "e",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

/// 阶乘
///
/// 负数返回 `NaN`；非整数按向下取整后的整数连乘（`3.5! == 6`）。
pub fn factorial(n: f64) -> f64 {
    if n.is_nan() || n < 0.0 {
        return f64::NAN;
    }
    if n.is_infinite() {
        return f64::INFINITY;
    }

    let mut result = 1.0;
    let mut i = 2.0;
    while i <= n {
        result *= i;
        // 乘积溢出后不再改变
        if result.is_infinite() {
            break;
        }
        i += 1.0;
    }
    result
}
