use serde::{Deserialize, Serialize};

use crate::models::contact::Contact;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
/// Largest offset a store accepts; MongoDB encodes `skip` as a signed 64-bit int.
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Query string of `GET /contacts`. Values stay raw strings so that garbage
/// input is coerced to defaults instead of failing extraction.
#[derive(Deserialize, Debug, Default)]
pub struct ContactListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub filters: Option<String>,
}

impl ContactListParams {
    pub fn page(&self) -> u64 {
        coerce_positive(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u64 {
        coerce_positive(self.limit.as_deref(), DEFAULT_LIMIT)
    }

    /// `(page - 1) * limit`, capped at `MAX_SKIP`.
    pub fn skip(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.limit()).min(MAX_SKIP)
    }
}

/// Reads the leading decimal digits of `raw` (so `"3abc"` is 3); anything
/// absent, unparseable or below 1 yields `default`.
pub fn coerce_positive(raw: Option<&str>, default: u64) -> u64 {
    raw.map(str::trim_start)
        .map(|s| s.strip_prefix('+').unwrap_or(s))
        .map(|s| s.chars().take_while(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

#[derive(Serialize, Debug)]
pub struct ContactResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Contact,
}

impl From<Contact> for ContactResponse {
    fn from(mut contact: Contact) -> Self {
        let id = contact.id.take().map(|oid| oid.to_hex()).unwrap_or_default();
        Self {
            id,
            fields: contact,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ContactListResponse {
    pub contacts: Vec<ContactResponse>,
    pub current_page: u64,
    pub total_pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn coerces_like_parse_int() {
        assert_eq!(coerce_positive(None, 10), 10);
        assert_eq!(coerce_positive(Some(""), 10), 10);
        assert_eq!(coerce_positive(Some("abc"), 10), 10);
        assert_eq!(coerce_positive(Some("0"), 10), 10);
        assert_eq!(coerce_positive(Some("-4"), 10), 10);
        assert_eq!(coerce_positive(Some("7"), 10), 7);
        assert_eq!(coerce_positive(Some(" 3abc"), 10), 3);
        assert_eq!(coerce_positive(Some("+5"), 10), 5);
        assert_eq!(coerce_positive(Some("99999999999999999999999"), 10), 10);
    }

    #[test]
    fn params_default_when_absent() {
        let params = ContactListParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.skip(), 0);
    }

    #[test]
    fn skip_is_capped_for_huge_pages() {
        let params = ContactListParams {
            page: Some("1000000000000".to_string()),
            limit: Some("100000000".to_string()),
            filters: None,
        };
        assert_eq!(params.skip(), MAX_SKIP);
        assert!(i64::try_from(params.skip()).is_ok());

        let params = ContactListParams {
            page: Some("3".to_string()),
            limit: Some("5".to_string()),
            filters: None,
        };
        assert_eq!(params.skip(), 10);
    }

    #[test]
    fn response_exposes_hex_id() {
        let oid = ObjectId::new();
        let contact = Contact {
            id: Some(oid),
            state: Some("Active".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(ContactResponse::from(contact)).unwrap();
        assert_eq!(json["_id"], oid.to_hex());
        assert_eq!(json["state"], "Active");
        assert!(json.get("cin").is_none());
    }
}
