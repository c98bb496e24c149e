use crate::core::{IdentityResolver, UserId};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use std::collections::HashMap;

/// Maps bearer tokens to users. Stands in for the hosted auth service.
#[derive(Debug, Clone, Default)]
pub struct TokenIdentity {
    tokens: HashMap<String, UserId>,
}

impl TokenIdentity {
    pub fn new(tokens: impl IntoIterator<Item = (String, UserId)>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }
}

impl IdentityResolver for TokenIdentity {
    fn resolve(&self, headers: &HeaderMap) -> Option<UserId> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))?
            .trim();
        self.tokens.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn identity() -> TokenIdentity {
        TokenIdentity::new([("tok-alice".to_string(), UserId::new("alice"))])
    }

    #[test]
    fn test_resolves_known_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-alice"));
        assert_eq!(identity().resolve(&headers), Some(UserId::new("alice")));
    }

    #[test]
    fn test_unknown_or_missing_token_is_anonymous() {
        let mut headers = HeaderMap::new();
        assert_eq!(identity().resolve(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
        assert_eq!(identity().resolve(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic tok-alice"));
        assert_eq!(identity().resolve(&headers), None);
    }
}
