//! Customer identity derived from verified access-token claims.

use serde_json::Value;
use tracing::warn;

use super::jwt::Claims;
use crate::errors::IdentityError;
use crate::query::IdentityExtractor;

/// Customer id carried in the `sub` claim.
///
/// An absent or null subject is anonymous (`0`). Strings are read as
/// integers with base prefixes, numbers are truncated toward zero, and any
/// other shape is rejected.
pub fn customer_id_from_claims(claims: &Claims) -> Result<i64, IdentityError> {
    match &claims.sub {
        None | Some(Value::Null) => Ok(0),
        Some(Value::String(raw)) => crate::query::parse_int(raw).ok_or_else(|| {
            warn!(jwt_id = %claims.jti, "token subject is not an integer");
            IdentityError::malformed_subject(format!("subject '{raw}' is not an integer"))
        }),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(id) => Ok(id),
            None => n.as_f64().map(|id| id.trunc() as i64).ok_or_else(|| {
                IdentityError::malformed_subject(format!("subject {n} is out of range"))
            }),
        },
        Some(_) => {
            warn!(jwt_id = %claims.jti, "unhandled customer id type");
            Err(IdentityError::malformed_subject("unhandled customer id type"))
        }
    }
}

/// Identity source backed by the claims of the current request, if any.
#[derive(Debug, Clone, Copy)]
pub struct ClaimsIdentity<'a>(pub Option<&'a Claims>);

impl IdentityExtractor for ClaimsIdentity<'_> {
    fn customer_id(&self) -> Result<i64, IdentityError> {
        match self.0 {
            Some(claims) => customer_id_from_claims(claims),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn claims_with(sub: Option<Value>) -> Claims {
        Claims {
            jti: "jti-1".to_string(),
            sub,
            iat: 0,
            nbf: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_absent_subject_is_anonymous() {
        assert_eq!(customer_id_from_claims(&claims_with(None)), Ok(0));
        assert_eq!(customer_id_from_claims(&claims_with(Some(Value::Null))), Ok(0));
    }

    #[test]
    fn test_string_subject() {
        assert_eq!(customer_id_from_claims(&claims_with(Some(json!("42")))), Ok(42));
        assert_eq!(customer_id_from_claims(&claims_with(Some(json!("0x1F")))), Ok(31));
        assert!(matches!(
            customer_id_from_claims(&claims_with(Some(json!("abc")))),
            Err(IdentityError::MalformedSubject { .. })
        ));
    }

    #[test]
    fn test_numeric_subject_truncates() {
        assert_eq!(customer_id_from_claims(&claims_with(Some(json!(42)))), Ok(42));
        assert_eq!(customer_id_from_claims(&claims_with(Some(json!(42.9)))), Ok(42));
        assert_eq!(customer_id_from_claims(&claims_with(Some(json!(-3.5)))), Ok(-3));
    }

    #[test]
    fn test_other_shapes_are_rejected() {
        for sub in [json!(true), json!([1]), json!({"id": 1})] {
            assert!(customer_id_from_claims(&claims_with(Some(sub))).is_err());
        }
    }

    #[test]
    fn test_claims_identity() {
        let claims = claims_with(Some(json!("17")));
        assert_eq!(ClaimsIdentity(Some(&claims)).customer_id(), Ok(17));
        assert_eq!(ClaimsIdentity(None).customer_id(), Ok(0));
    }
}
