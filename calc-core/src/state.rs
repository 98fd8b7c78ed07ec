//! # State 模块
//!
//! 定义计算器按键状态机的状态。
//!
//! ## 设计原则
//!
//! - 所有状态必须**显式建模**
//! - 所有状态可序列化，便于宿主层检查与调试
//! - 不允许隐式全局状态

use serde::{Deserialize, Serialize};

/// 角度模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    /// 弧度
    #[default]
    Rad,
    /// 角度
    Deg,
}

impl AngleMode {
    /// 切换角度模式
    pub fn toggled(self) -> Self {
        match self {
            AngleMode::Rad => AngleMode::Deg,
            AngleMode::Deg => AngleMode::Rad,
        }
    }

    /// 显示标签（`RAD` / `DEG`）
    pub fn label(self) -> &'static str {
        match self {
            AngleMode::Rad => "RAD",
            AngleMode::Deg => "DEG",
        }
    }

    /// 把当前模式下的角度换算为弧度
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleMode::Rad => value,
            AngleMode::Deg => value.to_radians(),
        }
    }
}

/// 计算器状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorState {
    /// 显示屏文本，同时也是 `=` 时交给求值器的表达式
    pub display: String,

    /// 存储器（M+ / M- / MR / MC）
    pub memory: f64,

    /// 三角函数使用的角度模式
    pub angle_mode: AngleMode,

    /// 下一次数字输入是否清空显示屏
    ///
    /// 在显示计算结果、常量、存储器值之后置位。
    pub start_new_number: bool,
}

impl CalculatorState {
    /// 创建初始状态
    pub fn new(angle_mode: AngleMode) -> Self {
        Self {
            display: "0".to_string(),
            memory: 0.0,
            angle_mode,
            start_new_number: false,
        }
    }

    /// 把显示屏解析为数值
    pub fn display_value(&self) -> Option<f64> {
        self.display.trim().parse().ok()
    }
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new(AngleMode::default())
    }
}
