use jsonwebtoken::{decode, Algorithm, Header, Validation};

use super::{claims::FirebaseClaims, jwks::JwksCache};

pub async fn validate_jwt(
    token: &str,
    jwks_cache: &JwksCache,
    expected_issuer: &str,
    expected_audience: &str,
) -> Result<FirebaseClaims, String> {
    // Decode header to get kid
    let header = decode_header(token)?;
    if header.alg != Algorithm::RS256 {
        return Err(format!("Unexpected JWT algorithm: {:?}", header.alg));
    }
    let kid = header.kid.ok_or("Missing kid in JWT header")?;

    let decoding_key = jwks_cache.get_decoding_key(&kid).await?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[expected_issuer]);
    validation.set_audience(&[expected_audience]);
    validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
    validation.validate_exp = true;

    let token_data = decode::<FirebaseClaims>(token, &decoding_key, &validation)
        .map_err(|e| format!("JWT validation failed: {}", e))?;

    if token_data.claims.sub.is_empty() {
        return Err("JWT has an empty subject".to_string());
    }

    Ok(token_data.claims)
}

fn decode_header(token: &str) -> Result<Header, String> {
    jsonwebtoken::decode_header(token).map_err(|e| format!("Failed to decode JWT header: {}", e))
}
