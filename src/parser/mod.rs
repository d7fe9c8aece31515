//! 解析模块：规则匹配、客户端ID编解码、全局解析器
pub mod global;
pub mod matcher;
pub mod client_id;
pub mod parser;

// 导出核心接口
pub use self::global::{
    classify_user_agent, global_parser, init_global_parser, init_global_parser_with_rules,
    resolve_client_id,
};
pub use self::client_id::{ClientId, ID_SEPARATOR, NO_MATCH_INDEX};
pub use self::parser::{RuleCounts, UaParser};
