//! Prompt construction for character generation.

use zenith_core::{ChatMessage, GenerationPreferences};

/// System message framing every request.
pub const SYSTEM_PROMPT: &str = "You are a creative writer specializing in generating unique \
characters for fantasy and sci-fi settings. Always respond with valid JSON.";

const BASE_PROMPT: &str = r#"Generate a unique NPC (Non-Player Character) for a fantasy mega city named Zenith.
Provide the information in JSON format with exactly this structure:

{
    "Name": "Character's full name",
    "Age": numeric_age,
    "Species": "Species/Race name",
    "PhysicalDescription": "Detailed physical appearance description",
    "PersonalityDescription": "Detailed personality traits and characteristics",
    "ResidentDistrict": "The district or area where they live"
}

Guidelines:
- Make each character unique and interesting
- Physical descriptions should be vivid and detailed (2-3 sentences)
- Personality descriptions should include quirks, motivations, and behavioral traits
- Districts can be fantasy/sci-fi themed (e.g., "Merchant Quarter", "Tech District", "Mystic Gardens")
- Species can be fantasy races (elves, dwarves, orcs) or sci-fi aliens"#;

/// Build the user prompt, adding any preferences as soft constraints.
///
/// # Examples
///
/// ```
/// use zenith_core::GenerationPreferences;
/// use zenith_models::build_prompt;
///
/// let prefs = GenerationPreferences::builder()
///     .species_preference("Elf")
///     .age_range("25-35")
///     .build()
///     .unwrap();
/// let prompt = build_prompt(&prefs);
/// assert!(prompt.contains("- Species should be: Elf"));
/// assert!(prompt.contains("- Age should be in range: 25-35"));
/// assert!(!prompt.contains("Resident District should be"));
/// assert!(prompt.ends_with("Return ONLY the JSON object, no additional text."));
/// ```
pub fn build_prompt(prefs: &GenerationPreferences) -> String {
    let mut prompt = String::from(BASE_PROMPT);

    if let Some(species) = prefs.species() {
        prompt.push_str(&format!("\n- Species should be: {}", species));
    }
    if let Some(district) = prefs.district() {
        prompt.push_str(&format!("\n- Resident District should be: {}", district));
    }
    if let Some(age_range) = prefs.age() {
        prompt.push_str(&format!("\n- Age should be in range: {}", age_range));
    }

    prompt.push_str("\n\nReturn ONLY the JSON object, no additional text.");
    prompt
}

/// System and user messages for one record.
pub fn build_messages(prefs: &GenerationPreferences) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_prompt(prefs)),
    ]
}
