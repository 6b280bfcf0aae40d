/// 모든 원격 호출에 필요한 세션 정보. 전역 상태에서 읽지 않고 생성 시 주입한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Bearer 토큰. 없으면 인증 헤더를 보내지 않는다.
    pub token: Option<String>,
    /// 응답 메시지 언어 (`ko`, `en`)
    pub locale: String,
}

impl SessionContext {
    pub fn new(token: Option<String>, locale: impl Into<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            locale: locale.into(),
        }
    }

    pub fn authorization_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::SessionContext;

    #[test]
    fn blank_token_means_anonymous() {
        let s = SessionContext::new(Some("  ".into()), "en");
        assert_eq!(s.authorization_header(), None);
        let s = SessionContext::new(Some("abc".into()), "en");
        assert_eq!(s.authorization_header().as_deref(), Some("Bearer abc"));
    }
}
