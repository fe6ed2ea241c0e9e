use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

/// Default session lifetime.
pub const DEFAULT_LIFETIME_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and checks HS256 session tokens.
///
/// Tokens are stateless: nothing is stored server side, so a token stays
/// valid until `exp` no matter what happens to the session on the client.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn sign(&self, subject: &str) -> Result<String, AuthError> {
        self.sign_at(subject, Utc::now())
    }

    pub fn sign_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AuthError::TokenGeneration("token lifetime out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Returns the subject of a valid token.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = self.decode_claims(token)?;

        // Expiry is exclusive: a token is dead at exp, not after it.
        if now.timestamp() >= claims.exp {
            tracing::debug!("Token for {} expired at {}", claims.sub, claims.exp);
            return Err(AuthError::InvalidToken);
        }

        Ok(claims.sub)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in verify_at.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(secret, Duration::seconds(3600))
    }

    fn epoch(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn round_trips_subject() {
        let issuer = issuer("k1");
        let token = issuer.sign("u1").unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), "u1");
    }

    #[test]
    fn valid_until_just_before_expiry() {
        let issuer = issuer("k1");
        let token = issuer.sign_at("u1", epoch(0)).unwrap();

        assert_eq!(issuer.verify_at(&token, epoch(3599)).unwrap(), "u1");
        assert!(matches!(
            issuer.verify_at(&token, epoch(3601)),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expires_exactly_at_exp() {
        let issuer = issuer("k1");
        let token = issuer.sign_at("u1", epoch(0)).unwrap();
        assert!(matches!(
            issuer.verify_at(&token, epoch(3600)),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_fails_against_wall_clock() {
        let issuer = issuer("k1");
        let token = issuer
            .sign_at("u1", Utc::now() - Duration::seconds(3601))
            .unwrap();
        assert!(matches!(issuer.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn other_secret_fails() {
        let token = issuer("k1").sign("u1").unwrap();
        assert!(matches!(
            issuer("k2").verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn claims_carry_iat_and_exp() {
        let issuer = issuer("k1");
        let token = issuer.sign_at("u1", epoch(0)).unwrap();
        let claims = issuer.decode_claims(&token).unwrap();
        assert_eq!(claims.iat, epoch(0).timestamp());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn signature_is_deterministic_for_same_instant() {
        let issuer = issuer("k1");
        let a = issuer.sign_at("u1", epoch(0)).unwrap();
        let b = issuer.sign_at("u1", epoch(0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_tokens_fail() {
        let issuer = issuer("k1");
        for token in ["", "abc", "a.b.c", "Bearer x.y.z"] {
            assert!(matches!(
                issuer.verify(token),
                Err(AuthError::InvalidToken)
            ));
        }
    }

    #[test]
    fn tampered_payload_fails() {
        let issuer = issuer("k1");
        let token = issuer.sign("u1").unwrap();
        let other = issuer.sign("u2").unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(matches!(issuer.verify(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn out_of_range_lifetime_is_generation_error() {
        let issuer = TokenIssuer::new("k1", Duration::days(365 * 1_000_000));
        assert!(matches!(
            issuer.sign_at("u1", epoch(0)),
            Err(AuthError::TokenGeneration(_))
        ));
    }

    #[test]
    fn debug_hides_keys() {
        let rendered = format!("{:?}", issuer("k1"));
        assert!(rendered.contains("lifetime"));
        assert!(!rendered.contains("k1"));
    }
}
