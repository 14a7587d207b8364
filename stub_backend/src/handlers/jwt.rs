use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

pub fn generate_token(secret: &str, user_id: &str, ttl: chrono::Duration) -> jsonwebtoken::errors::Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(secret: &str, token: &str) -> jsonwebtoken::errors::Result<jsonwebtoken::TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    #[test]
    fn expired_tokens_are_rejected() {
        let token = generate_token("k", "admin-1", chrono::Duration::seconds(-5)).unwrap();
        let err = verify_token("k", &token).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::ExpiredSignature);

        let token = generate_token("k", "admin-1", chrono::Duration::hours(1)).unwrap();
        assert_eq!(verify_token("k", &token).unwrap().claims.sub, "admin-1");
        assert!(verify_token("other", &token).is_err());
    }
}
