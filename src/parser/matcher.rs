//! 规则匹配：按优先级扫描规则列表，或按下标直接回查单条规则
//!
//! 规则下标同时承担两个角色：
//! 1. 匹配优先级：列表越靠前越优先，扫描时第一条命中即返回
//! 2. 回查键：写入客户端ID，还原时直接定位到该条规则，不再扫描
//!
//! `None` 表示没有规则命中，编码到客户端ID中为 -1

use crate::compiler::FacetPattern;
use crate::error::ResolveError;

/// 按顺序扫描，返回第一条命中规则的结果和下标；全部未命中返回未知结果和 None
pub fn first_match<P: FacetPattern>(patterns: &[P], line: &str) -> (P::Value, Option<usize>) {
    patterns
        .iter()
        .enumerate()
        .find_map(|(index, pattern)| pattern.apply(line).map(|value| (value, Some(index))))
        .unwrap_or_else(|| (P::unknown(), None))
}

/// 只应用指定下标的规则
/// None 直接返回未知结果；规则不存在或不再命中输入时返回错误
pub fn apply_at<P: FacetPattern>(
    patterns: &[P],
    index: Option<usize>,
    line: &str,
) -> Result<P::Value, ResolveError> {
    let Some(index) = index else {
        return Ok(P::unknown());
    };

    let pattern = patterns.get(index).ok_or(ResolveError::IndexOutOfRange {
        facet: P::FACET,
        index: index as i64,
        rule_count: patterns.len(),
    })?;

    pattern.apply(line).ok_or(ResolveError::MatchInconsistent {
        facet: P::FACET,
        index,
    })
}
