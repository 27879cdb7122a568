use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: String,
    pub user_id: String,
    pub count: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCounterRequest {
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub payment_data: PaymentData,
}

fn default_currency() -> String {
    "JPY".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub signature: String,
    pub intermediate_signing_key: IntermediateSigningKey,
    pub protocol_version: String,
    pub signed_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntermediateSigningKey {
    pub signed_key: String,
    pub signatures: Vec<String>,
}

impl PaymentData {
    // Stands in for the payment-provider SDK: the pay endpoint only checks
    // the shape of the authorization payload, never its signature.
    pub fn simulated() -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            signature: format!("local_signature_{now}"),
            intermediate_signing_key: IntermediateSigningKey {
                signed_key: "local_signed_key".to_string(),
                signatures: vec!["local_sig_1".to_string(), "local_sig_2".to_string()],
            },
            protocol_version: "ECv2".to_string(),
            signed_message: format!("local_signed_message_{now}"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub success: bool,
    pub counter: Counter,
    pub payment_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedCount {
    pub count: u32,
    pub last_updated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_payment_audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_success_audio_url: Option<String>,
}
