use domain::OwnerId;
use serde_json::Value;
use std::collections::HashMap;

/// API Gateway の Cognito オーソライザーが検証済みのクレーム
///
/// 所有者はここから取り出した `sub` だけで決まり、リクエストボディ側の値は一切参照しない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    pub sub: Option<String>,
}

impl Claims {
    /// `requestContext.authorizer.claims` のマップから抽出
    pub fn from_map(claims: &HashMap<String, Value>) -> Self {
        Self {
            sub: claims
                .get("sub")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
        }
    }

    /// 所有者 ID（`sub` が無い・空の場合は `None`）
    pub fn owner_id(&self) -> Option<OwnerId> {
        self.sub.as_deref().and_then(|sub| OwnerId::parse(sub).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims_map(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extracts_owner_from_sub_only() {
        let claims = Claims::from_map(&claims_map(json!({
            "sub": "abc-123",
            "email": "test@example.com",
            "cognito:username": "taro"
        })));

        assert_eq!(claims.owner_id().unwrap().as_str(), "abc-123");
        assert_eq!(
            claims,
            Claims {
                sub: Some("abc-123".to_string())
            }
        );
    }

    #[test]
    fn test_missing_or_blank_sub_has_no_owner() {
        assert!(Claims::from_map(&claims_map(json!({"email": "a@b.c"})))
            .owner_id()
            .is_none());
        assert!(Claims::from_map(&claims_map(json!({"sub": ""})))
            .owner_id()
            .is_none());
        assert!(Claims::from_map(&claims_map(json!({"sub": 42})))
            .owner_id()
            .is_none());
    }
}
