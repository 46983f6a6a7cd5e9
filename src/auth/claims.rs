use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FirebaseClaims {
    pub sub: String,  // Firebase uid
    pub aud: String,  // Firebase project id
    pub iss: String,  // https://securetoken.google.com/<project id>
    pub exp: i64,     // Expiration timestamp
    pub iat: i64,     // Issued at timestamp
    #[serde(default)]
    pub auth_time: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}
