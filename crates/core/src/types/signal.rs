//! Social media signals reporting needs on the ground.

use serde::{Deserialize, Serialize};

/// Urgency tag attached to a social post by the upstream classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Warning,
    Info,
}

/// What the poster is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeedType {
    Water,
    Food,
    Shelter,
    Medical,
    Rescue,
    Other,
}

/// A classified social post. Fields the engine does not use (avatar, likes,
/// ...) are ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSignal {
    pub id: String,
    pub content: String,
    pub location: String,
    pub urgency: Urgency,
    pub need_type: NeedType,
    #[serde(default)]
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_ignores_unknown_fields() {
        let json = r#"{
            "id": "7",
            "username": "Emily Johnson",
            "content": "Need drinking water on Main St",
            "location": "Houston, TX",
            "urgency": "urgent",
            "needType": "water",
            "likes": 12,
            "verified": true
        }"#;
        let signal: SocialSignal = serde_json::from_str(json).unwrap();
        assert_eq!(signal.need_type, NeedType::Water);
        assert_eq!(signal.urgency, Urgency::Urgent);
        assert!(signal.verified);
    }
}
