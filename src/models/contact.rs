use mongodb::bson::{Document, oid::ObjectId, to_document};
use serde::{Deserialize, Serialize};

use crate::errors::StoreResult;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Contact {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(rename = "mailingStage", skip_serializing_if = "Option::is_none")]
    pub mailing_stage: Option<i32>,
}

/// Partial update of a contact. Only the keys present in the request body are
/// written; anything not declared here is rejected when the body is parsed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(rename = "mailingStage", skip_serializing_if = "Option::is_none")]
    pub mailing_stage: Option<i32>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        *self == ContactPatch::default()
    }

    /// Body of the `$set` operator: one entry per field present in the patch.
    pub fn to_set_document(&self) -> StoreResult<Document> {
        Ok(to_document(self)?)
    }

    pub fn apply_to(&self, contact: &mut Contact) {
        fn set<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }

        set(&mut contact.cin, &self.cin);
        set(&mut contact.company_name, &self.company_name);
        set(&mut contact.state, &self.state);
        set(&mut contact.activity, &self.activity);
        set(&mut contact.email, &self.email);
        set(&mut contact.email_sent, &self.email_sent);
        set(&mut contact.doi, &self.doi);
        set(&mut contact.mailing_stage, &self.mailing_stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn set_document_contains_only_present_fields() {
        let patch = ContactPatch {
            state: Some("Active".to_string()),
            mailing_stage: Some(2),
            ..Default::default()
        };

        let set = patch.to_set_document().unwrap();
        assert_eq!(set, doc! { "state": "Active", "mailingStage": 2 });
    }

    #[test]
    fn unknown_patch_fields_are_rejected() {
        let result = serde_json::from_str::<ContactPatch>(r#"{"state":"Active","owner":"me"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn apply_leaves_absent_fields_untouched() {
        let mut contact = Contact {
            company_name: Some("Acme".to_string()),
            state: Some("Dormant".to_string()),
            email_sent: Some(false),
            ..Default::default()
        };
        let patch = ContactPatch {
            state: Some("Active".to_string()),
            ..Default::default()
        };

        patch.apply_to(&mut contact);

        assert_eq!(contact.state.as_deref(), Some("Active"));
        assert_eq!(contact.company_name.as_deref(), Some("Acme"));
        assert_eq!(contact.email_sent, Some(false));
    }

    #[test]
    fn empty_patch() {
        assert!(ContactPatch::default().is_empty());
        let patch: ContactPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }
}
