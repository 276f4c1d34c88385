use sha2::{Digest, Sha256};

/// Signs upload parameters.
///
/// Parameters are sorted by name, joined as `k=v` pairs with `&`, the API
/// secret is appended and the whole string is hashed with SHA-256.
/// Empty values are left out of the signature.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut signed: Vec<&(&str, String)> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = signed
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
