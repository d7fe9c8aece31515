//! 替换模板工具模块
//! 负责将规则中的替换模板（如 "$1 $2"）与正则捕获结果合成为字段值
//! 仅支持 $<数字> 格式的分组引用，数字为捕获数组的下标（$1 对应 captures[1]，不是第1个元素）

/// 替换模板展开工具
pub struct Replacement;

impl Replacement {
    /// 展开模板中的所有 $<数字> 占位符
    ///
    /// # 参数
    /// - `template`: 替换模板
    /// - `captures`: 捕获数组，下标0为整体匹配，下标 >= 1 为分组
    ///
    /// # 规则
    /// 1. 下标满足 `0 < n < captures.len()` 时替换为 `captures[n]`
    /// 2. 其余情况（$0、越界、数值溢出、含非 ASCII 数字）原样输出 `$` 和数字
    /// 3. 单独的 `$`（后面不是数字）原样输出
    /// 4. 单次从左到右扫描，替换结果不会被再次展开
    pub fn expand_all(template: &str, captures: &[&str]) -> String {
        expand(template, captures, None)
    }

    /// 仅展开指定下标的占位符，其他占位符原样保留
    /// 用于字段只有一个固定来源分组的场景（如 family_replacement 只引用 $1）
    pub fn expand_single(template: &str, captures: &[&str], index: usize) -> String {
        expand(template, captures, Some(index))
    }
}

fn expand(template: &str, captures: &[&str], target: Option<usize>) -> String {
    if !template.contains('$') {
        return template.to_string();
    }

    let mut output = String::with_capacity(template.len());
    // 当前占位符数字部分的起始位置（紧跟在 $ 之后）
    let mut token_start: Option<usize> = None;

    for (pos, ch) in template.char_indices() {
        match token_start {
            None if ch == '$' => token_start = Some(pos + 1),
            None => output.push(ch),
            // 非 ASCII 数字也计入占位符，随后解析失败原样输出
            Some(_) if ch.is_numeric() => {}
            Some(start) => {
                write_token(&mut output, &template[start..pos], captures, target);
                if ch == '$' {
                    token_start = Some(pos + 1);
                } else {
                    token_start = None;
                    output.push(ch);
                }
            }
        }
    }

    if let Some(start) = token_start {
        write_token(&mut output, &template[start..], captures, target);
    }

    output
}

fn write_token(output: &mut String, digits: &str, captures: &[&str], target: Option<usize>) {
    match token_index(digits, captures.len(), target) {
        Some(index) => output.push_str(captures[index]),
        None => {
            output.push('$');
            output.push_str(digits);
        }
    }
}

/// 空数字串和溢出都会解析失败，按越界处理
fn token_index(digits: &str, capture_len: usize, target: Option<usize>) -> Option<usize> {
    let index: usize = digits.parse().ok()?;
    let in_range = index > 0 && index < capture_len;
    (in_range && target.is_none_or(|t| t == index)).then_some(index)
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURES: [&str; 3] = ["full", "v1", "v2"];

    #[test]
    fn test_expand_uses_array_index_not_position() {
        assert_eq!(Replacement::expand_all("$1", &CAPTURES), "v1");
        assert_eq!(Replacement::expand_all("$2", &CAPTURES), "v2");
    }

    #[test]
    fn test_expand_out_of_range_kept_verbatim() {
        assert_eq!(Replacement::expand_all("$5", &CAPTURES), "$5");
        assert_eq!(Replacement::expand_all("$3", &CAPTURES), "$3");
        // $0 为整体匹配，不参与替换
        assert_eq!(Replacement::expand_all("$0", &CAPTURES), "$0");
    }

    #[test]
    fn test_expand_double_dollar() {
        assert_eq!(Replacement::expand_all("$$2", &CAPTURES), "$v2");
        assert_eq!(Replacement::expand_all("$$3", &CAPTURES), "$$3");
        assert_eq!(Replacement::expand_all("$$", &CAPTURES), "$$");
    }

    #[test]
    fn test_expand_bare_dollar_and_trailing_dollar() {
        assert_eq!(Replacement::expand_all("US$ price", &CAPTURES), "US$ price");
        assert_eq!(Replacement::expand_all("cost$", &CAPTURES), "cost$");
        assert_eq!(Replacement::expand_all("$a$1", &CAPTURES), "$av1");
    }

    #[test]
    fn test_expand_multiple_tokens_and_literals() {
        assert_eq!(
            Replacement::expand_all("Foo $1-$2 bar", &CAPTURES),
            "Foo v1-v2 bar"
        );
        assert_eq!(Replacement::expand_all("$1$2", &CAPTURES), "v1v2");
        // 数字串整体作为下标：$12 不会被拆成 $1 + "2"
        assert_eq!(Replacement::expand_all("$12", &CAPTURES), "$12");
    }

    #[test]
    fn test_expand_overflowing_index_kept_verbatim() {
        let template = "$99999999999999999999999999999999";
        assert_eq!(Replacement::expand_all(template, &CAPTURES), template);
    }

    #[test]
    fn test_expand_non_ascii_digits_kept_verbatim() {
        // U+0663 阿拉伯-印度数字 3
        assert_eq!(Replacement::expand_all("$1\u{0663}", &CAPTURES), "$1\u{0663}");
        assert_eq!(Replacement::expand_all("$\u{0663} $1", &CAPTURES), "$\u{0663} v1");
        assert_eq!(Replacement::expand_single("$1\u{0663}", &CAPTURES, 1), "$1\u{0663}");
    }

    #[test]
    fn test_expand_does_not_recurse_into_captures() {
        let captures = ["full", "$2", "x"];
        assert_eq!(Replacement::expand_all("$1", &captures), "$2");
    }

    #[test]
    fn test_expand_without_tokens() {
        assert_eq!(Replacement::expand_all("Chrome", &CAPTURES), "Chrome");
        assert_eq!(Replacement::expand_all("", &CAPTURES), "");
        assert_eq!(Replacement::expand_all("Ärger $1", &CAPTURES), "Ärger v1");
    }

    #[test]
    fn test_expand_single_only_touches_target() {
        assert_eq!(Replacement::expand_single("$1 $2", &CAPTURES, 1), "v1 $2");
        assert_eq!(Replacement::expand_single("$1 $2", &CAPTURES, 2), "$1 v2");
        assert_eq!(Replacement::expand_single("Opera", &CAPTURES, 1), "Opera");
    }

    #[test]
    fn test_expand_single_target_out_of_range() {
        // 目标分组不存在时不会越界访问
        assert_eq!(Replacement::expand_single("$3", &CAPTURES, 3), "$3");
        assert_eq!(Replacement::expand_single("$$1", &CAPTURES, 1), "$v1");
    }
}
