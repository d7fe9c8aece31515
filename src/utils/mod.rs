//! 工具模块：替换模板展开
pub mod replacement;

pub use self::replacement::Replacement;
