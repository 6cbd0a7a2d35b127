//! Caller preferences and the request envelope that carries them.

use serde::{Deserialize, Deserializer, Serialize};

/// Largest batch accepted when no other ceiling is configured.
pub const DEFAULT_MAX_COUNT: u32 = 20;

/// Optional soft constraints for character generation.
///
/// Absent or blank preferences leave the choice to the model.
///
/// # Examples
///
/// ```
/// use zenith_core::GenerationPreferences;
///
/// let prefs: GenerationPreferences =
///     serde_json::from_str(r#"{"species_preference": "Elf", "districtPreference": " "}"#).unwrap();
/// assert_eq!(prefs.species(), Some("Elf"));
/// assert_eq!(prefs.district(), None);
/// assert_eq!(prefs.count, 1);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_builder::Builder,
)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationPreferences {
    /// Desired species
    #[serde(
        alias = "species_preference",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(default, setter(into, strip_option))]
    pub species_preference: Option<String>,
    /// Desired district of residence
    #[serde(
        alias = "district_preference",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(default, setter(into, strip_option))]
    pub district_preference: Option<String>,
    /// Free-form age range such as "25-35"
    #[serde(
        alias = "age_range",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(default, setter(into, strip_option))]
    pub age_range: Option<String>,
    /// Number of records to generate
    #[builder(default = "1")]
    pub count: u32,
}

impl Default for GenerationPreferences {
    fn default() -> Self {
        Self {
            species_preference: None,
            district_preference: None,
            age_range: None,
            count: 1,
        }
    }
}

impl GenerationPreferences {
    /// Creates a new builder.
    pub fn builder() -> GenerationPreferencesBuilder {
        GenerationPreferencesBuilder::default()
    }

    /// Species preference, if one was given and is not blank.
    pub fn species(&self) -> Option<&str> {
        non_blank(&self.species_preference)
    }

    /// District preference, if one was given and is not blank.
    pub fn district(&self) -> Option<&str> {
        non_blank(&self.district_preference)
    }

    /// Age range, if one was given and is not blank.
    pub fn age(&self) -> Option<&str> {
        non_blank(&self.age_range)
    }

    /// Returns a copy with `count` replaced.
    pub fn with_count(&self, count: u32) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }

    /// Checks the count against the configured ceiling.
    ///
    /// # Errors
    ///
    /// Returns the offending condition if `count` is zero or above `max_count`.
    pub fn validate(&self, max_count: u32) -> Result<(), PreferenceIssue> {
        if self.count == 0 {
            return Err(PreferenceIssue::ZeroCount);
        }
        if self.count > max_count {
            return Err(PreferenceIssue::CountTooLarge {
                requested: self.count,
                max: max_count,
            });
        }
        Ok(())
    }
}

/// Why a set of preferences was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PreferenceIssue {
    /// `count` was zero
    #[display("count must be at least 1")]
    ZeroCount,
    /// `count` exceeded the ceiling
    #[display("count must be at most {}, got {}", max, requested)]
    CountTooLarge {
        /// Requested count
        requested: u32,
        /// Configured ceiling
        max: u32,
    },
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty()))
}

/// Preferences plus the identifiers needed to correlate an asynchronous reply.
///
/// # Examples
///
/// ```
/// use zenith_core::{GenerationPreferences, GenerationRequest};
///
/// let request = GenerationRequest::new(GenerationPreferences::default());
/// assert_eq!(request.request_id.len(), 36);
/// assert!(request.response_topic.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Correlation identifier
    pub request_id: String,
    /// Topic the response should be published to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_topic: Option<String>,
    /// What to generate
    pub preferences: GenerationPreferences,
}

impl GenerationRequest {
    /// Wraps preferences with a fresh UUID v4 identifier.
    pub fn new(preferences: GenerationPreferences) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            response_topic: None,
            preferences,
        }
    }

    /// Uses the caller's identifier when one is supplied and not blank.
    pub fn with_optional_id(request_id: Option<String>, preferences: GenerationPreferences) -> Self {
        match request_id.filter(|id| !id.trim().is_empty()) {
            Some(request_id) => Self {
                request_id,
                response_topic: None,
                preferences,
            },
            None => Self::new(preferences),
        }
    }

    /// Sets the response topic.
    pub fn response_topic(mut self, topic: Option<String>) -> Self {
        self.response_topic = topic.filter(|topic| !topic.trim().is_empty());
        self
    }
}
