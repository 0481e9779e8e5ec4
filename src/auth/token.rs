use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::{debug, instrument};

use super::types::TokenClaims;
use crate::config::AuthConfig;
use crate::shared::AppError;

/// Issues and verifies stateless HS256 access tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    pub token_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact, no clock skew allowance
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.signing_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.signing_key.as_bytes()),
            validation,
            token_ttl: config.token_ttl,
        }
    }

    /// Creates a signed token for the given user, expiring after the configured TTL
    #[instrument(skip(self))]
    pub fn create_token(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + self.token_ttl).timestamp() as usize;

        debug!(
            ttl_seconds = self.token_ttl.num_seconds(),
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = TokenClaims {
            user_id,
            exp,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::Internal
        })
    }

    /// Verifies signature and expiry, returning the claims if valid.
    /// Reads only the token, the key and the wall clock.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| {
                debug!(
                    user_id = data.claims.user_id,
                    exp = data.claims.exp,
                    "JWT token decoded successfully"
                );
                data.claims
            })
            .map_err(|e| {
                debug!(error = %e, "Failed to decode JWT token");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                    ErrorKind::InvalidSignature => AppError::InvalidSignature,
                    _ => AppError::MalformedToken,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn service_with_ttl(ttl: Duration) -> TokenService {
        TokenService::new(&AuthConfig::new("test-signing-key", "test-salt", ttl))
    }

    fn service() -> TokenService {
        service_with_ttl(Duration::hours(12))
    }

    const BASE64URL: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    /// Flips the high bit of the sextet at `position` in the signature.
    /// The low bits of the final character stay zero, so the result still decodes.
    fn flip_signature_bit(token: &str, position: usize) -> String {
        let (signed_part, signature) = token.rsplit_once('.').unwrap();
        let mut bytes = signature.as_bytes().to_vec();
        let sextet = BASE64URL.iter().position(|&c| c == bytes[position]).unwrap();
        bytes[position] = BASE64URL[sextet ^ 0b10_0000];
        format!("{}.{}", signed_part, String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_create_and_validate_token() {
        let service = service();

        let token = service.create_token(42).unwrap();
        assert!(!token.is_empty());
        assert_eq!(token.matches('.').count(), 2);

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp - claims.iat, 12 * 60 * 60);
    }

    #[test]
    fn test_expired_token() {
        let service = service_with_ttl(Duration::hours(-1));
        let token = service.create_token(42).unwrap();

        let result = service.validate_token(&token);
        assert!(matches!(result, Err(AppError::ExpiredToken)));
    }

    #[test]
    fn test_tampered_signature() {
        let service = service();
        let token = service.create_token(42).unwrap();
        let signature_len = token.rsplit_once('.').unwrap().1.len();
        assert_eq!(signature_len, 43);

        for position in 0..signature_len {
            let tampered = flip_signature_bit(&token, position);
            assert_ne!(tampered, token);
            assert!(
                matches!(service.validate_token(&tampered), Err(AppError::InvalidSignature)),
                "position {}",
                position
            );
        }
    }

    #[test]
    fn test_token_with_different_secret() {
        let issuer = TokenService::new(&AuthConfig::new("key-one", "salt", Duration::hours(1)));
        let verifier = TokenService::new(&AuthConfig::new("key-two", "salt", Duration::hours(1)));

        let token = issuer.create_token(1).unwrap();

        assert!(issuer.validate_token(&token).is_ok());
        assert!(matches!(
            verifier.validate_token(&token),
            Err(AppError::InvalidSignature)
        ));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("invalid.token.here")]
    fn test_malformed_token(#[case] token: &str) {
        let result = service().validate_token(token);
        assert!(matches!(result, Err(AppError::MalformedToken)));
    }
}
