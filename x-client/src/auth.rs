//! OAuth 1.0a request signing (HMAC-SHA1, user context).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use boltbot_core::XCredentials;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use urlencoding::encode;

type HmacSha1 = Hmac<Sha1>;

const NONCE_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct OAuth1Signer {
    credentials: XCredentials,
}

impl OAuth1Signer {
    pub fn new(credentials: XCredentials) -> Self {
        Self { credentials }
    }

    /// Builds the `Authorization` header for a request with a fresh nonce.
    ///
    /// `params` are the query or form parameters that take part in the
    /// signature. A JSON body never does.
    pub fn authorization_header(&self, method: &str, url: &str, params: &[(&str, &str)]) -> String {
        let nonce: String = std::iter::repeat_with(fastrand::alphanumeric)
            .take(NONCE_LEN)
            .collect();
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_header_with(method, url, params, &nonce, timestamp)
    }

    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> String {
        let timestamp = timestamp.to_string();
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.credentials.api_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let mut signed: Vec<(&str, &str)> = oauth_params.clone();
        signed.extend_from_slice(params);
        let signature = self.sign(method, url, &signed);
        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort();

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
            .collect();

        format!("OAuth {}", fields.join(", "))
    }

    /// Computes the base64 HMAC-SHA1 signature over the signature base string.
    pub fn sign(&self, method: &str, url: &str, params: &[(&str, &str)]) -> String {
        let base = signature_base_string(method, url, params);
        let key = format!(
            "{}&{}",
            encode(&self.credentials.api_secret),
            encode(&self.credentials.access_token_secret)
        );

        // HMAC accepts keys of any length
        let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC key length");
        mac.update(base.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

/// `METHOD&encoded-url&encoded-sorted-params`
pub fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (encode(key).into_owned(), encode(value).into_owned()))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&parameter_string)
    )
}
