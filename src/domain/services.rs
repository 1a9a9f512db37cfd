use crate::domain::model::{DomainRule, RuleSetDocument, TransformResult};

/// 將原始規則文本過濾成 sing-box 規則集
///
/// 逐行處理：跳過空行與 `#`/`!` 註解行，含數字的行視為 IP 條目整行剔除，
/// 其餘行原樣作為域名收進規則集。
pub fn build_ruleset(raw: &str) -> TransformResult {
    let mut rules = Vec::new();

    for line in raw.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('#') || stripped.starts_with('!') {
            continue;
        }
        if stripped.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }

        rules.push(DomainRule {
            domain: vec![stripped.to_string()],
        });
    }

    let accepted = rules.len();
    TransformResult {
        document: RuleSetDocument::new(rules),
        accepted,
    }
}
