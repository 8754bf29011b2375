//! Verification of access tokens issued by the external auth service.

use crate::config::Config;
use crate::error::{AppError, AppResult};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: String,
}

/// Returns the claims of a valid, unexpired access token. Signature and
/// expiry failures surface as `AppError::Jwt`.
pub fn decode_access_token(token: &str, config: &Config) -> AppResult<Claims> {
    let algorithm = Algorithm::from_str(&config.security.algorithm).unwrap_or(Algorithm::HS256);
    let validation = Validation::new(algorithm);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.security.secret_key.as_bytes()),
        &validation,
    )?;

    if data.claims.token_type != "access" {
        return Err(AppError::Unauthenticated(
            "Only access tokens are accepted".to_string(),
        ));
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_token;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn sign(config: &Config, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config.security.secret_key.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_access_token_decodes() {
        let config = Config::default();
        let token = create_test_token(&config, 42);

        let claims = decode_access_token(&token, &config).expect("token should verify");
        assert_eq!(claims.sub, "42");
    }

    #[test]
    fn test_refresh_token_is_rejected() {
        let config = Config::default();
        let token = sign(
            &config,
            &Claims {
                sub: "42".to_string(),
                exp: (Utc::now() + Duration::minutes(5)).timestamp(),
                token_type: "refresh".to_string(),
            },
        );

        assert!(matches!(
            decode_access_token(&token, &config),
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = Config::default();
        let token = sign(
            &config,
            &Claims {
                sub: "42".to_string(),
                exp: (Utc::now() - Duration::hours(1)).timestamp(),
                token_type: "access".to_string(),
            },
        );

        let err = decode_access_token(&token, &config).unwrap_err();
        assert!(matches!(err, AppError::Jwt(_)));
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = Config::default();
        let token = create_test_token(&config, 42);

        let mut other = Config::default();
        other.security.secret_key = "another-secret".to_string();

        assert!(matches!(
            decode_access_token(&token, &other),
            Err(AppError::Jwt(_))
        ));
    }
}
