//! # 表达式解析器
//!
//! 递归下降解析器，每个优先级一个解析函数，调用更高一级取得操作数。
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := ('+' | '-') factor
//!             | number ('^' factor)?
//! number     := digit* ('.' digit*)?      -- 至少一位数字
//! ```
//!
//! 光标只前进不回退。`eat` 在比较之前先跳过空格，匹配失败时不会把空格吐回去。
//! 语法树深度受 [`MAX_NESTING_DEPTH`] 限制。

use crate::error::{EvalError, EvalResult, Lookahead};
use crate::expr::ast::{BinaryOp, Expr, UnaryOp};

/// 表达式树允许的最大深度
///
/// 一元符号、乘方和同级运算链都会加深语法树。超过上限时返回
/// [`EvalError::NestingTooDeep`]，求值、`Display` 与析构的递归深度因此有界。
pub const MAX_NESTING_DEPTH: usize = 1000;

/// 解析表达式字符串
///
/// 整个输入必须被消费完，否则返回 [`EvalError::TrailingInput`]。
pub fn parse_expression(input: &str) -> EvalResult<Expr> {
    let mut parser = ExprParser::new(input);
    let (expr, _) = parser.parse_expression()?;

    // parse_expression 总是以一次失败的 eat 结束，末尾空格已被跳过
    if let Some(c) = parser.peek_char() {
        return Err(EvalError::TrailingInput {
            found: c,
            position: parser.pos,
        });
    }

    Ok(expr)
}

/// 子树及其深度
type Parsed = (Expr, usize);

/// 表达式解析器
///
/// 每次调用 [`parse_expression`] 都会创建独立实例，光标不在调用之间共享。
struct ExprParser<'a> {
    input: &'a str,
    /// 当前字节偏移
    pos: usize,
    /// 尚未闭合的乘方指数层数，即 parse_factor 的递归深度
    open_powers: usize,
}

impl<'a> ExprParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            open_powers: 0,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek_char() == Some(' ') {
            self.pos += 1;
        }
    }

    /// 尝试消费期望的字符
    fn eat(&mut self, expected: char) -> bool {
        self.skip_spaces();
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> EvalError {
        EvalError::UnexpectedCharacter {
            found: Lookahead::from(self.peek_char()),
            position: self.pos,
        }
    }

    fn too_deep(&self) -> EvalError {
        EvalError::NestingTooDeep {
            position: self.pos,
            limit: MAX_NESTING_DEPTH,
        }
    }

    /// 在深度为 `depth` 的子树之上再包一层
    fn nest(&self, depth: usize) -> EvalResult<usize> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        Ok(depth + 1)
    }

    /// 加减（最低优先级，左结合）
    fn parse_expression(&mut self) -> EvalResult<Parsed> {
        let (mut left, mut depth) = self.parse_term()?;

        loop {
            let op = if self.eat('+') {
                BinaryOp::Add
            } else if self.eat('-') {
                BinaryOp::Sub
            } else {
                return Ok((left, depth));
            };
            let (right, right_depth) = self.parse_term()?;
            depth = self.nest(depth.max(right_depth))?;
            left = Expr::binary(op, left, right);
        }
    }

    /// 乘除（左结合）
    fn parse_term(&mut self) -> EvalResult<Parsed> {
        let (mut left, mut depth) = self.parse_factor()?;

        loop {
            let op = if self.eat('*') {
                BinaryOp::Mul
            } else if self.eat('/') {
                BinaryOp::Div
            } else {
                return Ok((left, depth));
            };
            let (right, right_depth) = self.parse_factor()?;
            depth = self.nest(depth.max(right_depth))?;
            left = Expr::binary(op, left, right);
        }
    }

    /// 一元符号与乘方
    ///
    /// 乘方的底数只能是数字字面量，指数是完整的 factor，因此 `-2^2` 为 `-(2^2)`，
    /// `2^3^2` 为 `2^(3^2)`。连续的一元符号循环读取，不递归。
    fn parse_factor(&mut self) -> EvalResult<Parsed> {
        let mut signs = Vec::new();
        loop {
            self.skip_spaces();
            let sign_pos = self.pos;
            let op = if self.eat('+') {
                UnaryOp::Plus
            } else if self.eat('-') {
                UnaryOp::Minus
            } else {
                break;
            };
            if signs.len() >= MAX_NESTING_DEPTH {
                return Err(EvalError::NestingTooDeep {
                    position: sign_pos,
                    limit: MAX_NESTING_DEPTH,
                });
            }
            signs.push(op);
        }

        let (mut expr, mut depth) = self.parse_power()?;

        // 最靠近数字的符号最内层
        for op in signs.into_iter().rev() {
            depth = self.nest(depth)?;
            expr = Expr::unary(op, expr);
        }

        Ok((expr, depth))
    }

    fn parse_power(&mut self) -> EvalResult<Parsed> {
        let base = self.parse_number()?;

        if !self.eat('^') {
            return Ok((base, 1));
        }

        if self.open_powers >= MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        self.open_powers += 1;
        let (exponent, depth) = self.parse_factor()?;
        self.open_powers -= 1;

        let depth = self.nest(depth)?;
        Ok((Expr::pow(base, exponent), depth))
    }

    /// 解析数字字面量
    ///
    /// 同一数字中出现第二个 `.` 时直接报错，而不是截断。
    fn parse_number(&mut self) -> EvalResult<Expr> {
        let start = self.pos;
        let mut seen_digit = false;
        let mut seen_dot = false;

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                seen_digit = true;
            } else if c == '.' {
                if seen_dot {
                    return Err(self.unexpected());
                }
                seen_dot = true;
            } else {
                break;
            }
            self.pos += 1;
        }

        if !seen_digit {
            // 回到数字起点报告，单独的 "." 也在这里被拒绝
            self.pos = start;
            return Err(self.unexpected());
        }

        let literal = &self.input[start..self.pos];
        literal
            .parse::<f64>()
            .map(Expr::number)
            .map_err(|_| EvalError::UnexpectedCharacter {
                found: Lookahead::from(literal.chars().next()),
                position: start,
            })
    }
}
