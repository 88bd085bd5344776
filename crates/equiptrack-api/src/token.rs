use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

const TOKEN_LIFETIME_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("token signing secret is not usable: {0}")]
    InvalidSecret(jsonwebtoken::errors::Error),
    #[error("signing token: {0}")]
    Sign(jsonwebtoken::errors::Error),
    /// Bad signature, expired, malformed, missing subject: all of them.
    #[error("token rejected")]
    Rejected,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

#[derive(Clone)]
pub struct Signer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Signer {
    pub fn from_base64_secret(secret: &str) -> Result<Self, Error> {
        Ok(Self {
            encoding: EncodingKey::from_base64_secret(secret).map_err(Error::InvalidSecret)?,
            decoding: DecodingKey::from_base64_secret(secret).map_err(Error::InvalidSecret)?,
        })
    }

    /// Issues a bearer token for the subject, valid for seven days.
    pub fn issue(&self, subject: &str) -> Result<String, Error> {
        self.issue_expiring_at(
            subject,
            jiff::Timestamp::now().as_second() + TOKEN_LIFETIME_SECONDS,
        )
    }

    fn issue_expiring_at(&self, subject: &str, expiry: i64) -> Result<String, Error> {
        let claims = Claims {
            sub: subject.to_owned(),
            exp: expiry,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(Error::Sign)
    }

    /// Returns the subject carried by a valid, unexpired token. Every
    /// failure collapses into the same rejection so callers cannot tell
    /// which check failed.
    pub fn verify(&self, token: &str) -> Result<String, Error> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|_| Error::Rejected)
    }
}
