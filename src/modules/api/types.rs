use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A portal account as returned by login and signup
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub user_type: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Student profile. Every detail is optional until the student fills it in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: i64,
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub university: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub gpa: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub skills: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub interests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Profile {
    /// A profile counts as complete once the university is known
    pub fn is_complete(&self) -> bool {
        self.university
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false)
    }
}

/// One internship application
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Application {
    pub id: i64,
    pub user_id: i64,
    pub position: String,
    pub company: String,
    pub status: String,
    #[serde(default)]
    pub date_applied: String,
}

impl Application {
    pub fn matches(&self, position: &str, company: &str) -> bool {
        self.position == position && self.company == company
    }
}

// The portal stores year/gpa loosely, so numbers and strings both show up.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Generic `{ "message": ... }` body used by most endpoints
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to a reset code request. `reset_code` is only present on servers
/// that still disclose the code to the client.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ResetCodeResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reset_code: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

#[derive(Serialize, Debug)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Debug)]
pub struct SignupRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Debug)]
pub struct ApplyRequest<'a> {
    pub user_id: i64,
    pub position: &'a str,
    pub company: &'a str,
}

#[derive(Serialize, Debug)]
pub struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Serialize, Debug)]
pub struct VerifyCodeRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

#[derive(Serialize, Debug)]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
    pub new_password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_accepts_numbers_and_nulls() {
        let profile: Profile = serde_json::from_value(json!({
            "id": 3,
            "user_id": 7,
            "phone": "0712345678",
            "university": "Strathmore",
            "course": "BBIT",
            "year": 3,
            "gpa": 3.5,
            "skills": null,
            "updated_at": "2024-03-05 10:00:00"
        }))
        .unwrap();

        assert_eq!(profile.year.as_deref(), Some("3"));
        assert_eq!(profile.gpa.as_deref(), Some("3.5"));
        assert_eq!(profile.skills, None);
        assert_eq!(profile.interests, None);
        assert!(profile.is_complete());
    }

    #[test]
    fn test_profile_completeness() {
        let mut profile = Profile {
            user_id: 1,
            ..Profile::default()
        };
        assert!(!profile.is_complete());
        profile.university = Some("  ".to_string());
        assert!(!profile.is_complete());
        profile.university = Some("JKUAT".to_string());
        assert!(profile.is_complete());
    }

    #[test]
    fn test_profile_update_body_omits_server_fields() {
        let profile = Profile {
            user_id: 9,
            university: Some("UoN".to_string()),
            ..Profile::default()
        };
        let body = serde_json::to_value(&profile).unwrap();
        assert_eq!(body["user_id"], 9);
        assert_eq!(body["university"], "UoN");
        assert!(body.get("id").is_none());
        assert!(body.get("updated_at").is_none());
    }

    #[test]
    fn test_reset_code_response_without_code() {
        let response: ResetCodeResponse =
            serde_json::from_str(r#"{"message": "If an account exists..."}"#).unwrap();
        assert_eq!(response.reset_code, None);
        assert_eq!(response.message.as_deref(), Some("If an account exists..."));
    }
}
