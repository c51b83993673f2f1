use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::{MoneyMode, ScenarioKind, ScenarioResult};

pub const LEAD_SOURCE: &str = "advisor-tools";
pub const HANDOFF_TOOL_PARAM: &str = "tool";
pub const HANDOFF_CONTEXT_PARAM: &str = "context";
const MAX_SERVER_MESSAGE_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("name is required")]
    MissingName,
    #[error("phone '{0}' is not an 8-digit Singapore mobile number")]
    InvalidPhone(String),
    #[error("consent is required before submitting")]
    ConsentRequired,
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("lead endpoint rejected the submission ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("lead submission failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PreferredContact {
    WhatsApp,
    Call,
    Telegram,
}

/// Scenario key and summary carried from a calculator to the contact page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactHandoff {
    pub tool: ScenarioKind,
    pub summary: String,
}

impl ContactHandoff {
    pub fn from_result(result: &ScenarioResult, mode: MoneyMode) -> Self {
        Self {
            tool: result.kind(),
            summary: result.summary(mode),
        }
    }

    pub fn to_url(&self, contact_url: &str) -> Result<Url, LeadError> {
        let mut url = parse_url(contact_url)?;
        url.query_pairs_mut()
            .append_pair(HANDOFF_TOOL_PARAM, self.tool.key())
            .append_pair(HANDOFF_CONTEXT_PARAM, &self.summary);
        Ok(url)
    }

    /// Reads the handoff back from a contact page URL. Unknown tools are ignored.
    pub fn from_url(url: &Url) -> Option<Self> {
        let mut tool = None;
        let mut summary = String::new();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                HANDOFF_TOOL_PARAM => tool = ScenarioKind::from_key(&value),
                HANDOFF_CONTEXT_PARAM => summary = value.into_owned(),
                _ => {}
            }
        }
        tool.map(|tool| Self { tool, summary })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    pub agreed: bool,
    pub agreed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub name: String,
    pub phone: String,
    pub preferred_contact: PreferredContact,
    pub message: String,
    pub tool: Option<ScenarioKind>,
    pub context: Option<String>,
    pub page_url: String,
    pub submitted_at: DateTime<Utc>,
    pub source: String,
    pub consent: Consent,
}

/// Contact form as the visitor filled it in, before validation.
#[derive(Debug, Clone)]
pub struct LeadDraft {
    pub name: String,
    pub phone: String,
    pub preferred_contact: PreferredContact,
    pub message: String,
    pub handoff: Option<ContactHandoff>,
    pub page_url: String,
    pub consent: bool,
}

impl LeadDraft {
    pub fn into_payload(self, now: DateTime<Utc>) -> Result<LeadPayload, LeadError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(LeadError::MissingName);
        }
        let phone = normalize_sg_phone(&self.phone)?;
        if !self.consent {
            return Err(LeadError::ConsentRequired);
        }
        let (tool, context) = match self.handoff {
            Some(handoff) => (Some(handoff.tool), Some(handoff.summary)),
            None => (None, None),
        };

        Ok(LeadPayload {
            name,
            phone,
            preferred_contact: self.preferred_contact,
            message: self.message.trim().to_string(),
            tool,
            context,
            page_url: self.page_url,
            submitted_at: now,
            source: LEAD_SOURCE.to_string(),
            consent: Consent {
                agreed: true,
                agreed_at: now,
            },
        })
    }
}

/// Normalizes a Singapore mobile number to `+65XXXXXXXX`.
pub fn normalize_sg_phone(raw: &str) -> Result<String, LeadError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let local = match digits.len() {
        10 if digits.starts_with("65") => &digits[2..],
        _ => digits.as_str(),
    };
    let valid = local.len() == 8 && matches!(local.as_bytes()[0], b'8' | b'9');
    if !valid {
        return Err(LeadError::InvalidPhone(raw.trim().to_string()));
    }
    Ok(format!("+65{local}"))
}

fn parse_url(raw: &str) -> Result<Url, LeadError> {
    let url = Url::parse(raw).map_err(|e| LeadError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LeadError::InvalidUrl {
            url: raw.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    Ok(url)
}

fn truncate_server_message(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_SERVER_MESSAGE_CHARS {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_SERVER_MESSAGE_CHARS).collect();
    truncated.push('…');
    truncated
}

/// One-shot lead submission. No retries; the caller decides what to tell the visitor.
#[derive(Debug, Clone)]
pub struct LeadClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl LeadClient {
    pub fn new(endpoint: &str) -> Result<Self, LeadError> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: parse_url(endpoint)?,
        })
    }

    pub async fn submit(&self, payload: &LeadPayload) -> Result<(), LeadError> {
        info!(
            endpoint = %self.endpoint,
            tool = payload.tool.map(ScenarioKind::key),
            "submitting lead"
        );
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "lead accepted");
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "could not read rejection body");
                String::new()
            }
        };
        let message = truncate_server_message(&body);
        warn!(status = status.as_u16(), %message, "lead rejected");
        Err(LeadError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn sample_draft() -> LeadDraft {
        LeadDraft {
            name: "  Tan Wei Ling ".to_string(),
            phone: "9123 4567".to_string(),
            preferred_contact: PreferredContact::WhatsApp,
            message: "Keen to review my cover. ".to_string(),
            handoff: Some(ContactHandoff {
                tool: ScenarioKind::Resilience,
                summary: "Resilience Score 72/100 • Buffer 4.2 months".to_string(),
            }),
            page_url: "https://advisor.example.sg/contact".to_string(),
            consent: true,
        }
    }

    #[test]
    fn normalize_sg_phone_accepts_local_and_prefixed_forms() {
        assert_eq!(normalize_sg_phone("91234567").expect("valid"), "+6591234567");
        assert_eq!(normalize_sg_phone("8123-4567").expect("valid"), "+6581234567");
        assert_eq!(
            normalize_sg_phone("+65 9123 4567").expect("valid"),
            "+6591234567"
        );
        assert_eq!(
            normalize_sg_phone("(65) 8888 0000").expect("valid"),
            "+6588880000"
        );
    }

    #[test]
    fn normalize_sg_phone_rejects_non_mobile_numbers() {
        for raw in ["61234567", "9123456", "912345678", "+1 415 555 0100", ""] {
            assert!(
                matches!(normalize_sg_phone(raw), Err(LeadError::InvalidPhone(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn draft_becomes_payload_with_consent_record() {
        let payload = sample_draft()
            .into_payload(fixed_now())
            .expect("valid draft");

        assert_eq!(payload.name, "Tan Wei Ling");
        assert_eq!(payload.phone, "+6591234567");
        assert_eq!(payload.message, "Keen to review my cover.");
        assert_eq!(payload.tool, Some(ScenarioKind::Resilience));
        assert_eq!(payload.source, LEAD_SOURCE);
        assert!(payload.consent.agreed);
        assert_eq!(payload.consent.agreed_at, fixed_now());
    }

    #[test]
    fn draft_requires_name_phone_and_consent() {
        let mut draft = sample_draft();
        draft.name = "   ".to_string();
        assert!(matches!(
            draft.into_payload(fixed_now()),
            Err(LeadError::MissingName)
        ));

        let mut draft = sample_draft();
        draft.phone = "12345".to_string();
        assert!(matches!(
            draft.into_payload(fixed_now()),
            Err(LeadError::InvalidPhone(_))
        ));

        let mut draft = sample_draft();
        draft.consent = false;
        assert!(matches!(
            draft.into_payload(fixed_now()),
            Err(LeadError::ConsentRequired)
        ));
    }

    #[test]
    fn payload_serializes_with_web_field_names() {
        let payload = sample_draft()
            .into_payload(fixed_now())
            .expect("valid draft");
        let json = serde_json::to_value(&payload).expect("payload serializes");

        assert_eq!(json["preferredContact"], "WhatsApp");
        assert_eq!(json["tool"], "resilience");
        assert_eq!(json["pageUrl"], "https://advisor.example.sg/contact");
        assert_eq!(json["submittedAt"], "2025-03-14T09:30:00Z");
        assert_eq!(json["consent"]["agreedAt"], "2025-03-14T09:30:00Z");
        assert_eq!(json["source"], "advisor-tools");
    }

    #[test]
    fn handoff_round_trips_through_contact_url() {
        let handoff = ContactHandoff {
            tool: ScenarioKind::Protection,
            summary: "Protection gap $1,254,000 • RISK".to_string(),
        };
        let url = handoff
            .to_url("https://advisor.example.sg/contact")
            .expect("valid contact url");

        assert!(url.as_str().starts_with("https://advisor.example.sg/contact?tool=protection&context="));
        assert!(!url.as_str().contains(' '));
        assert_eq!(ContactHandoff::from_url(&url), Some(handoff));
    }

    #[test]
    fn handoff_without_known_tool_is_ignored() {
        let url = Url::parse("https://advisor.example.sg/contact?tool=lottery&context=hi")
            .expect("valid url");
        assert_eq!(ContactHandoff::from_url(&url), None);
    }

    #[test]
    fn lead_client_rejects_non_http_endpoints() {
        assert!(matches!(
            LeadClient::new("ftp://example.com/leads"),
            Err(LeadError::InvalidUrl { .. })
        ));
        assert!(matches!(
            LeadClient::new("not a url"),
            Err(LeadError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn server_message_is_truncated() {
        let long = "x".repeat(500);
        let truncated = truncate_server_message(&long);
        assert_eq!(truncated.chars().count(), MAX_SERVER_MESSAGE_CHARS + 1);
        assert!(truncated.ends_with('…'));
        assert_eq!(truncate_server_message("  bad phone  "), "bad phone");
    }
}
