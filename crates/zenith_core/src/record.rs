//! The generated character record and its structural validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single generated citizen of Zenith.
///
/// Serialized with camelCase keys. Deserialization also accepts the PascalCase
/// keys the model is prompted with and snake_case keys.
///
/// # Examples
///
/// ```
/// use zenith_core::CharacterRecord;
///
/// let record = CharacterRecord::builder()
///     .name("Ilsa Varn")
///     .age(34u32)
///     .species("Elf")
///     .physical_description("Tall, silver-haired, ink-stained fingers.")
///     .personality_description("Patient and wry.")
///     .resident_district("Lantern Quarter")
///     .build()
///     .unwrap();
///
/// assert_eq!(record.species(), "Elf");
/// assert!(record.validate().is_ok());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    /// Character name
    #[serde(alias = "Name")]
    #[builder(setter(into))]
    name: String,
    /// Age in years
    #[serde(alias = "Age")]
    age: u32,
    /// Species, e.g. "Elf" or "Clockwork Golem"
    #[serde(alias = "Species")]
    #[builder(setter(into))]
    species: String,
    /// Appearance
    #[serde(alias = "PhysicalDescription", alias = "physical_description")]
    #[builder(setter(into))]
    physical_description: String,
    /// Temperament and habits
    #[serde(alias = "PersonalityDescription", alias = "personality_description")]
    #[builder(setter(into))]
    personality_description: String,
    /// District of Zenith the character lives in
    #[serde(alias = "ResidentDistrict", alias = "resident_district")]
    #[builder(setter(into))]
    resident_district: String,
}

/// A reason a candidate record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RecordIssue {
    /// The candidate is not a JSON object
    #[display("reply is not a JSON object")]
    NotAnObject,
    /// A required field is absent or null
    #[display("missing field `{}`", _0)]
    Missing(&'static str),
    /// A required field is empty after trimming
    #[display("field `{}` is blank", _0)]
    Blank(&'static str),
    /// A field holds the wrong JSON type
    #[display("field `{}` must be {}", field, expected)]
    WrongType {
        /// Field name
        field: &'static str,
        /// Expected shape
        expected: &'static str,
    },
    /// Age parsed, but is zero or negative
    #[display("age must be positive, got {}", _0)]
    NonPositiveAge(String),
}

impl RecordIssue {
    /// Joins issues into a single human-readable reason.
    pub fn join(issues: &[RecordIssue]) -> String {
        issues
            .iter()
            .map(|issue| issue.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

const NAME: (&str, &[&str]) = ("name", &["name", "Name"]);
const AGE: (&str, &[&str]) = ("age", &["age", "Age"]);
const SPECIES: (&str, &[&str]) = ("species", &["species", "Species"]);
const PHYSICAL: (&str, &[&str]) = (
    "physicalDescription",
    &["physicalDescription", "PhysicalDescription", "physical_description"],
);
const PERSONALITY: (&str, &[&str]) = (
    "personalityDescription",
    &[
        "personalityDescription",
        "PersonalityDescription",
        "personality_description",
    ],
);
const DISTRICT: (&str, &[&str]) = (
    "residentDistrict",
    &["residentDistrict", "ResidentDistrict", "resident_district"],
);

impl CharacterRecord {
    /// Creates a new builder.
    pub fn builder() -> CharacterRecordBuilder {
        CharacterRecordBuilder::default()
    }

    /// Builds a record from loosely-shaped JSON, reporting every problem found.
    ///
    /// String fields are trimmed. `age` may be a JSON integer or a string holding
    /// one; zero, negative and fractional ages are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use zenith_core::{CharacterRecord, RecordIssue};
    /// use serde_json::json;
    ///
    /// let record = CharacterRecord::from_value(&json!({
    ///     "Name": "Brask", "Age": "51", "Species": "Dwarf",
    ///     "PhysicalDescription": "Broad.", "PersonalityDescription": "Gruff.",
    ///     "ResidentDistrict": "Anvil Row"
    /// }))
    /// .unwrap();
    /// assert_eq!(*record.age(), 51);
    ///
    /// let issues = CharacterRecord::from_value(&json!({"name": "  "})).unwrap_err();
    /// assert!(issues.contains(&RecordIssue::Blank("name")));
    /// assert!(issues.contains(&RecordIssue::Missing("species")));
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, Vec<RecordIssue>> {
        let Some(object) = value.as_object() else {
            return Err(vec![RecordIssue::NotAnObject]);
        };

        let mut issues = Vec::new();
        let name = text_field(object, NAME, &mut issues);
        let age = age_field(object, &mut issues);
        let species = text_field(object, SPECIES, &mut issues);
        let physical_description = text_field(object, PHYSICAL, &mut issues);
        let personality_description = text_field(object, PERSONALITY, &mut issues);
        let resident_district = text_field(object, DISTRICT, &mut issues);

        match (
            name,
            age,
            species,
            physical_description,
            personality_description,
            resident_district,
        ) {
            (
                Some(name),
                Some(age),
                Some(species),
                Some(physical_description),
                Some(personality_description),
                Some(resident_district),
            ) if issues.is_empty() => Ok(Self {
                name,
                age,
                species,
                physical_description,
                personality_description,
                resident_district,
            }),
            _ => Err(issues),
        }
    }

    /// Re-checks an already typed record, e.g. one read back from disk.
    pub fn validate(&self) -> Result<(), Vec<RecordIssue>> {
        let mut issues = Vec::new();
        let texts = [
            (NAME.0, &self.name),
            (SPECIES.0, &self.species),
            (PHYSICAL.0, &self.physical_description),
            (PERSONALITY.0, &self.personality_description),
            (DISTRICT.0, &self.resident_district),
        ];
        for (field, value) in texts {
            if value.trim().is_empty() {
                issues.push(RecordIssue::Blank(field));
            }
        }
        if self.age == 0 {
            issues.push(RecordIssue::NonPositiveAge("0".to_string()));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn text_field(
    object: &Map<String, Value>,
    (field, keys): (&'static str, &[&str]),
    issues: &mut Vec<RecordIssue>,
) -> Option<String> {
    match lookup(object, keys) {
        None => {
            issues.push(RecordIssue::Missing(field));
            None
        }
        Some(Value::String(text)) if text.trim().is_empty() => {
            issues.push(RecordIssue::Blank(field));
            None
        }
        Some(Value::String(text)) => Some(text.trim().to_string()),
        Some(_) => {
            issues.push(RecordIssue::WrongType {
                field,
                expected: "a string",
            });
            None
        }
    }
}

fn age_field(object: &Map<String, Value>, issues: &mut Vec<RecordIssue>) -> Option<u32> {
    let (field, keys) = AGE;
    let parsed = match lookup(object, keys) {
        None => Err(RecordIssue::Missing(field)),
        Some(Value::Number(number)) => {
            if let Some(age) = number.as_i64() {
                positive_age(age, number.to_string())
            } else if number.as_u64().is_some() {
                Err(RecordIssue::WrongType {
                    field,
                    expected: "an age that fits in 32 bits",
                })
            } else {
                Err(RecordIssue::WrongType {
                    field,
                    expected: "a whole number",
                })
            }
        }
        Some(Value::String(text)) if text.trim().is_empty() => Err(RecordIssue::Blank(field)),
        Some(Value::String(text)) => match text.trim().parse::<i64>() {
            Ok(age) => positive_age(age, text.trim().to_string()),
            Err(_) => Err(RecordIssue::WrongType {
                field,
                expected: "a whole number",
            }),
        },
        Some(_) => Err(RecordIssue::WrongType {
            field,
            expected: "a whole number",
        }),
    };

    match parsed {
        Ok(age) => Some(age),
        Err(issue) => {
            issues.push(issue);
            None
        }
    }
}

fn positive_age(age: i64, raw: String) -> Result<u32, RecordIssue> {
    if age <= 0 {
        return Err(RecordIssue::NonPositiveAge(raw));
    }
    u32::try_from(age).map_err(|_| RecordIssue::WrongType {
        field: AGE.0,
        expected: "an age that fits in 32 bits",
    })
}
