use serde::Serialize;

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_contacts: u64,
    pub total_sent: u64,
}
