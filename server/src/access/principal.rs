use shared::types::JwtClaims;

/// Authenticated identity attached to a request by the authentication layer.
///
/// Ids are kept exactly as they arrived in the claims; [`Principal::user_id`]
/// and [`Principal::role_id`] do the parsing so that a malformed claim reads
/// as "absent" instead of failing the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub name_identifier: Option<String>,
    pub role_id: Option<String>,
}

impl Principal {
    pub fn from_claims(claims: JwtClaims) -> Self {
        Self {
            name: claims.name,
            name_identifier: claims.name_identifier.filter(|s| !s.trim().is_empty()),
            role_id: claims.role_id.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        parse_id(self.name_identifier.as_deref())
    }

    pub fn role_id(&self) -> Option<i64> {
        parse_id(self.role_id.as_deref())
    }
}

fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(nameid: &str, role: Option<&str>) -> JwtClaims {
        JwtClaims {
            name: "alice".into(),
            name_identifier: Some(nameid.into()),
            role_id: role.map(Into::into),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn numeric_claims_parse() {
        let p = Principal::from_claims(claims("42", Some("3")));
        assert_eq!(p.user_id(), Some(42));
        assert_eq!(p.role_id(), Some(3));
    }

    #[test]
    fn malformed_claims_read_as_absent() {
        let p = Principal::from_claims(claims("forty-two", Some("admin")));
        assert_eq!(p.user_id(), None);
        assert_eq!(p.role_id(), None);
        assert_eq!(p.name, "alice");
    }

    #[test]
    fn blank_claims_are_dropped() {
        let p = Principal::from_claims(claims("  ", Some("")));
        assert!(p.name_identifier.is_none());
        assert!(p.role_id.is_none());
    }

    #[test]
    fn missing_nameid_keeps_name() {
        let p = Principal::from_claims(JwtClaims {
            name_identifier: None,
            ..claims("1", Some("2"))
        });
        assert_eq!(p.name, "alice");
        assert_eq!(p.user_id(), None);
        assert_eq!(p.role_id(), Some(2));
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let p = Principal::from_claims(claims(" 7 ", None));
        assert_eq!(p.user_id(), Some(7));
        assert_eq!(p.role_id(), None);
    }
}
