//! 全局解析器单例管理
//! 进程内唯一的 UaParser 实例，初始化后只读

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use super::parser::UaParser;
use crate::config::GlobalConfig;
use crate::error::{UaParserError, UaResult};
use crate::rule::{Client, RuleLibrary};

/// 全局解析器实例
static GLOBAL_PARSER: OnceCell<UaParser> = OnceCell::new();

/// 按配置初始化全局解析器
/// 已初始化时直接返回 Ok(())
pub async fn init_global_parser(config: GlobalConfig) -> UaResult<()> {
    if GLOBAL_PARSER.get().is_some() {
        debug!("全局解析器已初始化，跳过");
        return Ok(());
    }

    let parser = UaParser::new(config).await?;
    publish(parser);
    Ok(())
}

/// 使用已加载的规则库初始化全局解析器（同步接口）
pub fn init_global_parser_with_rules(rule_lib: &RuleLibrary, data_version: &str) -> UaResult<()> {
    if GLOBAL_PARSER.get().is_some() {
        debug!("全局解析器已初始化，跳过自定义规则库初始化");
        return Ok(());
    }

    let parser = UaParser::with_rules(rule_lib, data_version)?;
    publish(parser);
    Ok(())
}

// 并发初始化时以先完成者为准，后完成的实例直接丢弃
fn publish(parser: UaParser) {
    match GLOBAL_PARSER.set(parser) {
        Ok(()) => info!("全局解析器初始化完成"),
        Err(_) => debug!("全局解析器已被其他线程初始化，丢弃本次构建结果"),
    }
}

/// 获取全局解析器
pub fn global_parser() -> UaResult<&'static UaParser> {
    GLOBAL_PARSER.get().ok_or(UaParserError::ParserNotInitialized)
}

/// 使用全局解析器解析 UA
pub fn classify_user_agent(line: &str) -> UaResult<Client> {
    Ok(global_parser()?.classify(line))
}

/// 使用全局解析器还原客户端ID
pub fn resolve_client_id(id: &str, line: &str) -> UaResult<Client> {
    Ok(global_parser()?.resolve(id, line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::UserAgentRule;

    // 全局状态只在这一个测试里读写，避免测试间相互影响
    #[test]
    fn test_global_parser_lifecycle() {
        assert!(matches!(
            classify_user_agent("Chrome/120"),
            Err(UaParserError::ParserNotInitialized)
        ));

        let rule_lib = RuleLibrary {
            user_agent_parsers: vec![UserAgentRule {
                regex: r"(Chrome)/(\d+)".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        init_global_parser_with_rules(&rule_lib, "g1").unwrap();
        // 重复初始化是幂等的，不会替换已有实例
        init_global_parser_with_rules(&RuleLibrary::default(), "g2").unwrap();
        assert_eq!(global_parser().unwrap().data_version(), "g1");

        let client = classify_user_agent("Chrome/120").unwrap();
        assert_eq!(client.id, "g1 0 -1 -1");
        assert_eq!(client.user_agent.major, "120");

        let resolved = resolve_client_id(&client.id, "Chrome/120").unwrap();
        assert_eq!(resolved, client);

        let err = resolve_client_id("g1 0 -1", "Chrome/120").unwrap_err();
        assert!(matches!(err, UaParserError::Resolve(_)));
    }
}
