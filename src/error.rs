//! 全局错误类型定义

use std::fmt;
use std::io::Error as IoError;

use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use serde_yaml::Error as SerdeYamlError;
use thiserror::Error;
use url::ParseError as UrlParseError;

/// 规则维度（UA / OS / 设备）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    UserAgent,
    Os,
    Device,
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::UserAgent => write!(f, "user_agent"),
            Facet::Os => write!(f, "os"),
            Facet::Device => write!(f, "device"),
        }
    }
}

#[derive(Error, Debug)]
pub enum UaParserError {
    // 规则相关错误
    #[error("规则加载失败：{0}")]
    RuleLoadError(String),
    #[error("规则缓存失败：{0}")]
    RuleCacheError(String),
    #[error("YAML解析失败：{0}")]
    YamlError(#[from] SerdeYamlError),

    // 编译相关错误
    #[error("正则编译失败：{facet} 规则 #{index}：{source}")]
    RegexCompileError {
        facet: Facet,
        index: usize,
        #[source]
        source: RegexError,
    },
    #[error("无效的规则版本号：'{0}' 包含空格（空格是客户端ID的分隔符）")]
    InvalidDataVersion(String),

    // 解析器相关错误
    #[error("解析器未初始化")]
    ParserNotInitialized,
    #[error("客户端ID还原失败：{0}")]
    Resolve(#[from] ResolveError),

    // 网络相关错误
    #[error("网络请求失败：{0}")]
    HttpError(#[from] reqwest::Error),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("MessagePack序列化/反序列化失败：{0}")]
    MsgPackError(String),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
    #[error("异步任务执行失败：{0}")]
    AsyncTaskError(String),
}

/// 客户端ID还原错误
/// 均为可恢复错误，直接返回给调用方
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("无效的客户端ID格式：'{0}'")]
    InvalidIdentifier(String),
    #[error("客户端ID来自其他规则版本：期望 '{expected}'，实际 '{found}'")]
    GenerationMismatch { expected: String, found: String },
    #[error("{facet} 规则索引越界：{index}（规则总数 {rule_count}）")]
    IndexOutOfRange {
        facet: Facet,
        index: i64,
        rule_count: usize,
    },
    #[error("{facet} 规则 #{index} 未能复现匹配，输入与规则集不一致")]
    MatchInconsistent { facet: Facet, index: usize },
}

// 全局Result类型
pub type UaResult<T> = Result<T, UaParserError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_resolve_error_display() {
        let err = ResolveError::IndexOutOfRange {
            facet: Facet::Os,
            index: 42,
            rule_count: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("os"));
        assert!(msg.contains("42"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_resolve_error_converts_into_parser_error() {
        let err: UaParserError = ResolveError::MatchInconsistent {
            facet: Facet::Device,
            index: 7,
        }
        .into();
        assert!(matches!(
            err,
            UaParserError::Resolve(ResolveError::MatchInconsistent { index: 7, .. })
        ));
    }

    #[test]
    fn test_regex_compile_error_keeps_source() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = UaParserError::RegexCompileError {
            facet: Facet::UserAgent,
            index: 3,
            source,
        };
        assert!(err.to_string().contains("user_agent 规则 #3"));
        assert!(err.source().is_some());
    }
}
