//! Input validation shared across modules: denom/asset/endpoint shape checks
//! and injection screening for free-form strings before they enter state.
//!
//! Mirrors the teacher's `AssetInfo::check` style (fail fast, return a typed
//! error, never panic) but works over plain strings since this workspace has
//! no `Api`/`Addr` bech32 validator to delegate to.

use paw_errors::CommonError;

const MAX_DENOM_LEN: usize = 128;
const MAX_ASSET_LEN: usize = 64;
const MAX_ENDPOINT_LEN: usize = 512;

/// `^[a-zA-Z][a-zA-Z0-9/_\-.]*$`, length <= 128, per spec.md §4.4.
pub fn validate_denom(denom: &str) -> Result<(), CommonError> {
    if denom.is_empty() || denom.len() > MAX_DENOM_LEN {
        return Err(CommonError::InvalidDenom {
            denom: denom.to_string(),
            reason: format!("length must be 1..={MAX_DENOM_LEN}"),
        });
    }
    let mut chars = denom.chars();
    let first = chars.next().expect("checked non-empty above");
    if !first.is_ascii_alphabetic() {
        return Err(CommonError::InvalidDenom {
            denom: denom.to_string(),
            reason: "must start with a letter".to_string(),
        });
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '.')) {
        return Err(CommonError::InvalidDenom {
            denom: denom.to_string(),
            reason: "contains characters outside [a-zA-Z0-9/_-.]".to_string(),
        });
    }
    Ok(())
}

/// Asset names share the denom charset but a shorter length cap, per
/// spec.md §4.4.
pub fn validate_asset_name(asset: &str) -> Result<(), CommonError> {
    if asset.is_empty() || asset.len() > MAX_ASSET_LEN {
        return Err(CommonError::InvalidAsset {
            asset: asset.to_string(),
            reason: format!("length must be 1..={MAX_ASSET_LEN}"),
        });
    }
    let mut chars = asset.chars();
    let first = chars.next().expect("checked non-empty above");
    if !first.is_ascii_alphabetic() {
        return Err(CommonError::InvalidAsset {
            asset: asset.to_string(),
            reason: "must start with a letter".to_string(),
        });
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '.')) {
        return Err(CommonError::InvalidAsset {
            asset: asset.to_string(),
            reason: "contains characters outside [a-zA-Z0-9/_-.]".to_string(),
        });
    }
    Ok(())
}

/// Validates a provider `endpoint` URL per spec.md §4.3: scheme in
/// {http, https}, length <= 512, no path traversal, no shell metacharacters.
pub fn validate_endpoint(endpoint: &str) -> Result<(), CommonError> {
    if endpoint.is_empty() || endpoint.len() > MAX_ENDPOINT_LEN {
        return Err(CommonError::InvalidEndpoint {
            reason: format!("length must be 1..={MAX_ENDPOINT_LEN}"),
        });
    }
    let scheme_ok = endpoint.starts_with("http://") || endpoint.starts_with("https://");
    if !scheme_ok {
        return Err(CommonError::InvalidEndpoint {
            reason: "scheme must be http or https".to_string(),
        });
    }
    if endpoint.contains("..") {
        return Err(CommonError::InvalidEndpoint {
            reason: "path traversal sequence '..' is not allowed".to_string(),
        });
    }
    const SHELL_METACHARS: &[char] = &[
        ';', '|', '&', '$', '`', '\n', '\r', '>', '<', '\\', '!', '*', '?',
    ];
    if endpoint.chars().any(|c| SHELL_METACHARS.contains(&c)) {
        return Err(CommonError::InvalidEndpoint {
            reason: "contains shell metacharacters".to_string(),
        });
    }
    Ok(())
}

/// Screens a free-form string (request specs, dispute reasons, image
/// references, ...) for common SQL/XSS/XML/shell/path-traversal injection
/// markers before it is allowed into state, per spec.md §4.4.
pub fn screen_injection(field: &str, value: &str) -> Result<(), CommonError> {
    const MARKERS: &[&str] = &[
        "--", ";--", "/*", "*/", "xp_", "union select", "drop table", "or 1=1",
        "<script", "</script", "onerror=", "onload=", "javascript:",
        "<!entity", "<!doctype", "]]>",
        "$(", "`", "../", "..\\", "\0",
    ];
    let lower = value.to_ascii_lowercase();
    if MARKERS.iter().any(|m| lower.contains(m)) {
        return Err(CommonError::InjectionDetected {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denom_accepts_canonical_forms() {
        assert!(validate_denom("upaw").is_ok());
        assert!(validate_denom("ibc/ABCDEF").is_ok());
        assert!(validate_denom("factory/paw1.../sub-token").is_ok());
    }

    #[test]
    fn denom_rejects_bad_shapes() {
        assert!(validate_denom("").is_err());
        assert!(validate_denom("1upaw").is_err());
        assert!(validate_denom(&"u".repeat(200)).is_err());
        assert!(validate_denom("u paw").is_err());
    }

    #[test]
    fn endpoint_rejects_traversal_and_shell_metachars() {
        assert!(validate_endpoint("https://provider.example.com/v1").is_ok());
        assert!(validate_endpoint("ftp://provider.example.com").is_err());
        assert!(validate_endpoint("https://evil.com/../../etc/passwd").is_err());
        assert!(validate_endpoint("https://evil.com;rm -rf /").is_err());
    }

    #[test]
    fn injection_screening_flags_common_markers() {
        assert!(screen_injection("reason", "provider failed to deliver").is_ok());
        assert!(screen_injection("reason", "'; DROP TABLE requests;--").is_err());
        assert!(screen_injection("reason", "<script>alert(1)</script>").is_err());
    }
}
