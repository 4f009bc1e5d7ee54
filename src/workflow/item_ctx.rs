//! 单个对象的处理上下文
//!
//! 封装"我正在处理第几个对象、它的输入 key 和输出 key"这一信息

use std::fmt::Display;

use crate::models::output_key;

#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 在本次列表中的序号（从1开始，仅用于日志显示）
    pub index: usize,
    /// 列表中的对象总数
    pub total: usize,
    /// 输入对象 key
    pub input_key: String,
    /// 推导出的输出对象 key
    pub output_key: String,
}

impl ItemCtx {
    pub fn new(index: usize, total: usize, input_key: impl Into<String>) -> Self {
        let input_key = input_key.into();
        let output_key = output_key(&input_key);
        Self {
            index,
            total,
            input_key,
            output_key,
        }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[对象 {}/{} {}]", self.index, self.total, self.input_key)
    }
}
