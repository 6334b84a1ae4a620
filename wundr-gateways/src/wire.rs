//! Request/response shapes for the proxy endpoints, validated before
//! anything crosses into the core's typed entities. A schema violation
//! is an upstream failure for that call.

use serde::{Deserialize, Serialize};
use wundr_core::{CoreError, Label, Prompt};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelsRequest {
    pub image_base64: String,
    pub include_text: bool,
}

#[derive(Deserialize)]
pub struct LabelsResponse {
    pub labels: Vec<LabelWire>,
}

#[derive(Deserialize)]
pub struct LabelWire {
    pub label: String,
    pub score: f32,
}

impl LabelsResponse {
    /// One out-of-range score invalidates the whole response.
    pub fn into_labels(self) -> Result<Vec<Label>, CoreError> {
        let mut out = Vec::with_capacity(self.labels.len());
        for l in self.labels {
            if !(0.0..=1.0).contains(&l.score) {
                return Err(CoreError::Upstream(format!(
                    "label score {} outside [0,1]",
                    l.score
                )));
            }
            out.push(Label {
                label: l.label,
                score: l.score,
            });
        }
        Ok(out)
    }
}

#[derive(Serialize)]
pub struct TranslateRequest<'a> {
    pub word: &'a str,
    pub target: &'a str,
}

#[derive(Deserialize)]
pub struct TranslateResponse {
    pub translated: String,
}

impl TranslateResponse {
    pub fn into_translated(self) -> Result<String, CoreError> {
        if self.translated.trim().is_empty() {
            return Err(CoreError::Upstream("empty translation".to_string()));
        }
        Ok(self.translated)
    }
}

#[derive(Serialize)]
pub struct PromptsRequest<'a> {
    pub object: &'a str,
    #[serde(rename = "L1")]
    pub native: &'a str,
    #[serde(rename = "L2")]
    pub target: &'a str,
    pub level: &'a str,
    pub count: usize,
}

#[derive(Deserialize)]
pub struct PromptsResponse {
    pub prompts: Vec<PromptWire>,
}

#[derive(Deserialize)]
pub struct PromptWire {
    pub l2: String,
    pub l1: String,
}

impl PromptsResponse {
    /// A blank sentence on either side makes the whole batch unusable.
    pub fn into_prompts(self) -> Result<Vec<Prompt>, CoreError> {
        if self.prompts.is_empty() {
            return Err(CoreError::Upstream("no prompts returned".to_string()));
        }
        let mut out = Vec::with_capacity(self.prompts.len());
        for p in self.prompts {
            if p.l2.trim().is_empty() || p.l1.trim().is_empty() {
                return Err(CoreError::Upstream("blank prompt entry".to_string()));
            }
            out.push(Prompt { l2: p.l2, l1: p.l1 });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_request_uses_proxy_field_names() {
        let req = LabelsRequest {
            image_base64: "aGk=".to_string(),
            include_text: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["imageBase64"], "aGk=");
        assert_eq!(json["includeText"], true);
    }

    #[test]
    fn labels_response_converts_in_order() {
        let resp: LabelsResponse = serde_json::from_str(
            r#"{"labels":[{"label":"Guitar","score":0.92},{"label":"Wood","score":0.4}]}"#,
        )
        .unwrap();
        let labels = resp.into_labels().unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label, "Guitar");
        assert!((labels[0].score - 0.92).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_score_rejects_whole_response() {
        let resp: LabelsResponse =
            serde_json::from_str(r#"{"labels":[{"label":"Guitar","score":1.5}]}"#).unwrap();
        assert!(resp.into_labels().is_err());
    }

    #[test]
    fn empty_translation_is_an_upstream_failure() {
        let resp: TranslateResponse = serde_json::from_str(r#"{"translated":"  "}"#).unwrap();
        assert!(resp.into_translated().is_err());
    }

    #[test]
    fn prompts_request_uses_l1_l2_field_names() {
        let req = PromptsRequest {
            object: "guitar",
            native: "en",
            target: "es",
            level: "A2",
            count: 6,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["L1"], "en");
        assert_eq!(json["L2"], "es");
        assert_eq!(json["count"], 6);
    }

    #[test]
    fn blank_prompt_entry_rejects_the_batch() {
        let resp: PromptsResponse = serde_json::from_str(
            r#"{"prompts":[{"l2":"¿Tienes la guitarra?","l1":"Do you have the guitar?"},{"l2":"","l1":"x"}]}"#,
        )
        .unwrap();
        assert!(resp.into_prompts().is_err());
    }

    #[test]
    fn missing_prompts_field_fails_to_parse() {
        assert!(serde_json::from_str::<PromptsResponse>(r#"{"data":[]}"#).is_err());
    }
}
