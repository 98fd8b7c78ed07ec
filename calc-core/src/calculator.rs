//! # Calculator 模块
//!
//! 无界面的计算器按键状态机。
//!
//! ## 执行模型
//!
//! ```text
//! press(key) -> &str (新的显示屏文本)
//! ```
//!
//! 数字与运算符按键拼接出表达式文本，`=` 把整段文本交给
//! [`evaluate`](crate::evaluate)。科学函数只作用于显示屏上的单个数值。
//! 任何失败都只表现为显示屏上的 `Error`，状态机本身不会返回错误。

use crate::expr::evaluate;
use crate::format::format_result;
use crate::functions::{Constant, Function};
use crate::input::{Key, MemoryOp, Operator};
use crate::state::{AngleMode, CalculatorState};

/// 失败时显示的文本
pub const ERROR_DISPLAY: &str = "Error";

/// 计算器
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    state: CalculatorState,
}

impl Calculator {
    /// 创建新的计算器
    pub fn new(angle_mode: AngleMode) -> Self {
        Self {
            state: CalculatorState::new(angle_mode),
        }
    }

    /// 从已有状态恢复
    pub fn restore(state: CalculatorState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn display(&self) -> &str {
        &self.state.display
    }

    /// 处理一次按键，返回新的显示屏文本
    pub fn press(&mut self, key: Key) -> &str {
        match key {
            // 越界的数字键（例如反序列化得到的 `Digit(42)`）不会被截断
            Key::Digit(d) => match char::from_digit(u32::from(d), 10) {
                Some(c) => self.push_number_char(c),
                None => self.show_error(),
            },
            Key::Dot => self.push_number_char('.'),
            Key::Operator(op) => self.push_operator(op),
            Key::Function(func) => self.apply_function(func),
            Key::Constant(constant) => self.show_constant(constant),
            Key::Memory(op) => self.memory(op),
            Key::Clear => {
                self.state.display = "0".to_string();
                self.state.start_new_number = true;
            }
            Key::Delete => self.delete_last(),
            Key::Equals => self.equals(),
            Key::ToggleAngle => {
                self.state.angle_mode = self.state.angle_mode.toggled();
            }
        }
        &self.state.display
    }

    /// 依次处理多个按键
    pub fn press_all(&mut self, keys: impl IntoIterator<Item = Key>) -> &str {
        for key in keys {
            self.press(key);
        }
        &self.state.display
    }

    fn push_number_char(&mut self, c: char) {
        if self.state.start_new_number {
            self.state.display.clear();
            self.state.start_new_number = false;
        }
        if self.state.display == "0" {
            self.state.display = c.to_string();
        } else {
            self.state.display.push(c);
        }
    }

    fn push_operator(&mut self, op: Operator) {
        self.state.display.push(' ');
        self.state.display.push(op.symbol());
        self.state.display.push(' ');
        self.state.start_new_number = false;
    }

    fn apply_function(&mut self, func: Function) {
        match self.state.display_value() {
            Some(value) => {
                let result = func.apply(value, self.state.angle_mode);
                self.show_result(result);
            }
            None => self.show_error(),
        }
    }

    fn show_constant(&mut self, constant: Constant) {
        self.state.display = constant.value().to_string();
        self.state.start_new_number = true;
    }

    fn memory(&mut self, op: MemoryOp) {
        // 显示屏不是单个数值时按 0 处理
        let current = self.state.display_value().unwrap_or(0.0);
        match op {
            MemoryOp::Clear => self.state.memory = 0.0,
            MemoryOp::Recall => self.show_result(self.state.memory),
            MemoryOp::Add => self.state.memory += current,
            MemoryOp::Subtract => self.state.memory -= current,
        }
    }

    fn delete_last(&mut self) {
        let display = &mut self.state.display;
        if display.is_empty() || display.as_str() == "0" {
            return;
        }
        display.pop();
        if display.is_empty() {
            display.push('0');
        }
    }

    fn equals(&mut self) {
        match evaluate(&self.state.display) {
            Ok(result) => self.show_result(result),
            Err(_) => self.show_error(),
        }
    }

    fn show_result(&mut self, value: f64) {
        self.state.display = format_result(value);
        self.state.start_new_number = true;
    }

    /// 下一次数字输入会覆盖 `Error`
    fn show_error(&mut self) {
        self.state.display = ERROR_DISPLAY.to_string();
        self.state.start_new_number = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(labels: &str) -> Vec<Key> {
        labels
            .split_whitespace()
            .map(|label| Key::from_label(label).unwrap())
            .collect()
    }

    fn run(labels: &str) -> String {
        let mut calc = Calculator::default();
        calc.press_all(keys(labels)).to_string()
    }

    #[test]
    fn test_digits_replace_initial_zero() {
        let mut calc = Calculator::default();
        assert_eq!(calc.press(Key::Digit(7)), "7");
        assert_eq!(calc.press(Key::Digit(0)), "70");
        assert_eq!(calc.press(Key::Dot), "70.");
        assert_eq!(calc.press(Key::Digit(5)), "70.5");
    }

    #[test]
    fn test_out_of_range_digit_shows_error() {
        let mut calc = Calculator::default();
        calc.press(Key::Digit(1));
        assert_eq!(calc.press(Key::Digit(42)), ERROR_DISPLAY);
        // 下一次有效输入开始新数字
        assert_eq!(calc.press(Key::Digit(3)), "3");

        let key: Key = serde_json::from_str(r#"{"Digit":10}"#).unwrap();
        assert_eq!(Calculator::default().press(key), ERROR_DISPLAY);
    }

    #[test]
    fn test_leading_dot() {
        assert_eq!(run(". 5"), ".5");
        assert_eq!(run(". 5 + 1 ="), "1.5");
    }

    #[test]
    fn test_operator_appends_spaced_symbol() {
        assert_eq!(run("2 ×"), "2 * ");
        assert_eq!(run("2 × 3"), "2 * 3");
        assert_eq!(run("8 ÷ 2 ^ 2"), "8 / 2 ^ 2");
    }

    #[test]
    fn test_equals() {
        assert_eq!(run("2 + 3 × 4 ="), "14");
        assert_eq!(run("2 ^ 3 ^ 2 ="), "512");
        assert_eq!(run("1 ÷ 0 ="), "Infinity");
        assert_eq!(run("0 ÷ 0 ="), "NaN");
        assert_eq!(run("1 ÷ 4 ="), "0.25");
    }

    #[test]
    fn test_equals_error() {
        assert_eq!(run("2 + ="), ERROR_DISPLAY);
        assert_eq!(run(". ="), ERROR_DISPLAY);
    }

    #[test]
    fn test_digit_after_error_starts_new_number() {
        assert_eq!(run("2 + = 5"), "5");
    }

    #[test]
    fn test_result_chains_into_next_expression() {
        // 结果之后按运算符会在结果后继续拼接
        assert_eq!(run("2 + 3 = × 4 ="), "20");
        // 结果之后按数字会开始新数字
        assert_eq!(run("2 + 3 = 7"), "7");
    }

    #[test]
    fn test_functions() {
        assert_eq!(run("1 6 √"), "4");
        assert_eq!(run("5 x!"), "120");
        assert_eq!(run("4 1/x"), "0.25");
        assert_eq!(run("3 ±"), "-3");
        assert_eq!(run("5 0 %"), "0.5");
        assert_eq!(run("3 x²"), "9");
    }

    #[test]
    fn test_function_on_expression_is_error() {
        assert_eq!(run("2 + 3 sin"), ERROR_DISPLAY);
    }

    #[test]
    fn test_angle_mode() {
        assert_eq!(run("DEG 9 0 sin"), "1");
        assert_eq!(run("0 cos"), "1");

        let mut calc = Calculator::default();
        calc.press(Key::ToggleAngle);
        assert_eq!(calc.state().angle_mode, AngleMode::Deg);
        calc.press(Key::ToggleAngle);
        assert_eq!(calc.state().angle_mode, AngleMode::Rad);
    }

    #[test]
    fn test_constants() {
        assert_eq!(run("π"), "3.141592653589793");
        assert_eq!(run("e"), "2.718281828459045");
        // 常量之后的数字开始新数字
        assert_eq!(run("π 2"), "2");
        assert_eq!(run("π × 2 ="), "6.283185307179586");
    }

    #[test]
    fn test_memory() {
        let mut calc = Calculator::default();
        calc.press_all(keys("5 M+ C 3 M+ C 1 M-"));
        assert_eq!(calc.state().memory, 7.0);

        assert_eq!(calc.press(Key::Memory(MemoryOp::Recall)), "7");
        assert!(calc.state().start_new_number);

        calc.press(Key::Memory(MemoryOp::Clear));
        assert_eq!(calc.state().memory, 0.0);
    }

    #[test]
    fn test_memory_ignores_non_numeric_display() {
        let mut calc = Calculator::default();
        calc.press_all(keys("2 + 3 M+"));
        assert_eq!(calc.state().memory, 0.0);
    }

    #[test]
    fn test_clear() {
        assert_eq!(run("1 2 3 C"), "0");
        assert_eq!(run("1 2 3 C 4"), "4");
    }

    #[test]
    fn test_delete() {
        assert_eq!(run("1 2 3 ⌫"), "12");
        assert_eq!(run("1 ⌫"), "0");
        assert_eq!(run("⌫"), "0");
        assert_eq!(run("2 + ⌫ ⌫ ⌫"), "2");
    }

    #[test]
    fn test_restore() {
        let mut state = CalculatorState::new(AngleMode::Deg);
        state.display = "4 + 4".to_string();
        let mut calc = Calculator::restore(state);
        assert_eq!(calc.press(Key::Equals), "8");
        assert_eq!(calc.state().angle_mode, AngleMode::Deg);
    }
}
