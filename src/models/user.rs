use serde::{Deserialize, Serialize};

/// The UserProfile struct represents the server-side account record as seen
/// by the client. Immutable here except by replacement via a fresh fetch.
///
/// Wire field names are camelCase to match the API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub phone_verified: bool,
    pub role: Option<Role>,
    pub profile_picture_url: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Account roles known to this client. The server contract for this field
/// is open-ended, so unknown values are carried through rather than
/// rejected; treat an `Other` at display time as a forward-compatibility
/// signal, not an error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Business,
    Freelancer,
    Admin,
    Instructor,
    #[serde(untagged)]
    Other(String),
}

/// Signup providers known to this client. Same open-ended contract as
/// [`Role`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignupProvider {
    Email,
    Google,
    Github,
    Linkedin,
    Phone,
    #[serde(untagged)]
    Other(String),
}
