use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by a Supabase access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Verifies access tokens issued by the identity backend (HS256, project secret)
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(jwt_secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);

        Self {
            key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = decode::<AccessClaims>(token, &self.key, &self.validation)?;
        Ok(AuthUser {
            id: data.claims.sub,
            email: data.claims.email,
        })
    }

    /// Verify the `Authorization: Bearer` header of a request
    pub fn authenticate(&self, req: &HttpRequest) -> Result<AuthUser, AuthError> {
        let token = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        aud: &'a str,
        exp: usize,
        email: &'a str,
    }

    fn sign(secret: &str, aud: &str, exp: usize) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &TestClaims { sub: "user-1", aud, exp, email: "a@b.test" },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn far_future() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn test_valid_token() {
        let verifier = TokenVerifier::new("secret", "authenticated");
        let user = verifier.verify(&sign("secret", "authenticated", far_future())).unwrap();

        assert_eq!(user.id, "user-1");
        assert_eq!(user.email.as_deref(), Some("a@b.test"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let verifier = TokenVerifier::new("secret", "authenticated");
        assert!(verifier.verify(&sign("other", "authenticated", far_future())).is_err());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let verifier = TokenVerifier::new("secret", "authenticated");
        assert!(verifier.verify(&sign("secret", "anon", far_future())).is_err());
    }

    #[test]
    fn test_missing_header() {
        let verifier = TokenVerifier::new("secret", "authenticated");
        let req = actix_web::test::TestRequest::default().to_http_request();

        assert!(matches!(verifier.authenticate(&req), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_bearer_header() {
        let verifier = TokenVerifier::new("secret", "authenticated");
        let token = sign("secret", "authenticated", far_future());
        let req = actix_web::test::TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();

        assert_eq!(verifier.authenticate(&req).unwrap().id, "user-1");
    }
}
