//! rsuaparser - 基于 uap-core 规则的 User-Agent 解析工具
//!
//! 将 UA 字符串按三个互不相关的维度（客户端软件、操作系统、设备）解析，
//! 每个维度按规则顺序匹配，第一条命中的规则生效。
//! 解析结果附带紧凑客户端ID，配合原始 UA 可在之后还原出完全相同的结果。
//!
//! ```rust,ignore
//! use rsuaparser::UaParser;
//!
//! let parser = UaParser::from_yaml(&std::fs::read_to_string("regexes.yaml")?, "2024.01")?;
//! let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0";
//! let client = parser.classify(ua);
//! println!("{} / {} / {} ({})", client.user_agent, client.os, client.device, client.id);
//!
//! // 只保存ID，之后配合原始 UA 还原
//! let restored = parser.resolve(&client.id, ua)?;
//! assert_eq!(restored, client);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// 导出全局错误类型
pub use self::error::{Facet, ResolveError, UaParserError, UaResult};

// 导出配置模块
pub use self::config::{ConfigManager, CustomConfigBuilder, GlobalConfig};

// 导出规则模块核心接口
pub use self::rule::{
    Client, Device, DeviceRule, FAMILY_UNKNOWN, Os, OsRule, RuleCacheManager, RuleLibrary,
    RuleLoader, UserAgent, UserAgentRule,
};

// 导出工具模块核心接口
pub use self::utils::Replacement;

// 导出编译模块核心接口
pub use self::compiler::{CompiledRuleLibrary, FacetPattern, RuleCompiler};

// 导出解析模块核心接口
pub use self::parser::{
    ClientId, ID_SEPARATOR, NO_MATCH_INDEX, RuleCounts, UaParser, classify_user_agent,
    global_parser, init_global_parser, init_global_parser_with_rules, resolve_client_id,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod utils;
pub mod compiler;
pub mod parser;
