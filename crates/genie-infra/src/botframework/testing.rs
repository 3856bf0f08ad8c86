//! Channel token fixtures: a fixed RSA signing key, its JWK set and the
//! OpenID metadata that points at it.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode, get_current_timestamp};
use serde_json::{Value, json};

use super::channel_auth::CHANNEL_ISSUER;

pub const TEST_KEY_ID: &str = "genie-test-key";

const SIGNING_KEY_PEM: &str = include_str!("../../testdata/channel-signing-key.pem");

/// Base64url modulus of the fixture key (exponent is 65537).
const MODULUS: &str = "rjfP99dWSTi2NgVnDVZ8yFQQsAbCWGEqR5-e3Cqce0l1R1Aerpqnxv_W5TA-c_0joKC2z8kBMzkJqqMR-iwMGrpGYUL5j75o1jlCGTCToc1DTHw7gqEjaMbStGo5KIfnOXPGaJbLfRynQhSDs_EDxw17UtrrUm96rpzZV0Cr1jsuWcXyM_5STGx46LUY3tM3I9cymB9Ez-w4a2_m8H_hcS8X8bNRhT4ysnm7c4iiViq59U1V4FGVwDuKZrHOuTb4lJ4TAiWGj9_9r33k33RDQ6uTeDfiFjRXYgH0I_fllVhwgGqVd4ZI0gWJZHvkoQ175K7_FRAWXzeoOvTgg77oHw";

pub fn openid_metadata(jwks_uri: &str) -> Value {
    json!({
        "issuer": CHANNEL_ISSUER,
        "jwks_uri": jwks_uri,
        "id_token_signing_alg_values_supported": ["RS256"]
    })
}

pub fn jwks() -> Value {
    json!({
        "keys": [{
            "kty": "RSA",
            "use": "sig",
            "kid": TEST_KEY_ID,
            "n": MODULUS,
            "e": "AQAB"
        }]
    })
}

/// Claims a channel would send for `app_id`, valid for an hour.
pub fn channel_claims(app_id: &str, service_url: &str) -> Value {
    let now = get_current_timestamp();
    json!({
        "iss": CHANNEL_ISSUER,
        "aud": app_id,
        "serviceurl": service_url,
        "nbf": now - 60,
        "exp": now + 3600
    })
}

pub fn sign_token(claims: &Value) -> String {
    sign_token_with_kid(claims, TEST_KEY_ID)
}

pub fn sign_token_with_kid(claims: &Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY_PEM.as_bytes()).expect("fixture key parses");
    encode(&header, claims, &key).expect("fixture token signs")
}
