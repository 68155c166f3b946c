//! NIST 800-53 control record

use serde::Serialize;

/// Family code of a control identifier: everything before the first hyphen.
/// Identifiers without a hyphen are their own family.
pub fn family_code(control_id: &str) -> &str {
    control_id
        .split_once('-')
        .map(|(family, _)| family)
        .unwrap_or(control_id)
}

/// A single control as delivered by the controls API.
///
/// Controls are immutable once built; the family code is derived from the
/// identifier at construction and cannot drift from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    id: String,
    name: String,
    family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    official_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    enhancements: Vec<String>,
}

impl Control {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let family = family_code(&id).to_string();
        Self {
            id,
            name: name.into(),
            family,
            intent: None,
            official_text: None,
            enhancements: Vec::new(),
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_official_text(mut self, text: impl Into<String>) -> Self {
        self.official_text = Some(text.into());
        self
    }

    pub fn with_enhancements<I, S>(mut self, enhancements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enhancements = enhancements.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn intent(&self) -> Option<&str> {
        self.intent.as_deref()
    }

    pub fn official_text(&self) -> Option<&str> {
        self.official_text.as_deref()
    }

    pub fn enhancements(&self) -> &[String] {
        &self.enhancements
    }

    /// Text fields searched by the query filter, in match order
    pub fn searchable_fields(&self) -> [Option<&str>; 4] {
        [
            Some(self.id.as_str()),
            Some(self.name.as_str()),
            self.intent.as_deref(),
            self.official_text.as_deref(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_code() {
        assert_eq!(family_code("AC-2"), "AC");
        assert_eq!(family_code("AC-2(1)"), "AC");
        assert_eq!(family_code("PM"), "PM");
        assert_eq!(family_code(""), "");
        assert_eq!(family_code("SC-7-3"), "SC");
    }

    #[test]
    fn test_control_builder() {
        let control = Control::new("AU-2", "Event Logging")
            .with_intent("Identify events to log")
            .with_enhancements(["AU-2(1)", "AU-2(2)"]);

        assert_eq!(control.family(), "AU");
        assert_eq!(control.intent(), Some("Identify events to log"));
        assert_eq!(control.official_text(), None);
        assert_eq!(control.enhancements().len(), 2);
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let json = serde_json::to_value(Control::new("AC-2", "Account Management")).unwrap();
        assert_eq!(json["family"], "AC");
        assert!(json.get("intent").is_none());
        assert!(json.get("enhancements").is_none());
    }
}
