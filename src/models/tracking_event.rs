use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One email open, recorded each time the tracking pixel is fetched.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub mail_id: String,
    pub timestamp: DateTime,
    pub device_type: String,
    pub ip_address: Option<String>,
}

impl TrackingEvent {
    pub fn new(mail_id: String, device_type: String, ip_address: Option<String>) -> Self {
        Self {
            id: None,
            mail_id,
            timestamp: DateTime::now(),
            device_type,
            ip_address,
        }
    }
}
