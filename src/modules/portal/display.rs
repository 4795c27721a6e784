use itertools::Itertools;

use crate::modules::api::{Application, Profile, User};
use crate::modules::utils::time::format_api_date;

pub const MSG_PROFILE_EMPTY: &str = "Please complete your profile to view information.";
pub const MSG_NO_APPLICATIONS: &str = "No applications yet. Start applying to internships!";

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Greeting shown after login or signup
pub fn render_welcome(user: &User) -> String {
    format!("Welcome back, {}!", user.first_name)
}

/// Profile page text, or a hint when the profile is not filled in yet
pub fn render_profile(user: &User, profile: Option<&Profile>) -> String {
    let profile = match profile {
        Some(profile) if profile.is_complete() => profile,
        _ => return MSG_PROFILE_EMPTY.to_string(),
    };

    let mut out = String::new();
    out.push_str("=== Personal Information ===\n");
    out.push_str(&format!("Name:  {}\n", user.full_name()));
    out.push_str(&format!("Email: {}\n", user.email));
    out.push_str(&format!("Phone: {}\n", field(&profile.phone)));
    out.push_str("\n=== Academic Information ===\n");
    out.push_str(&format!("University:    {}\n", field(&profile.university)));
    out.push_str(&format!("Course:        {}\n", field(&profile.course)));
    out.push_str(&format!("Year of Study: Year {}\n", field(&profile.year)));
    out.push_str(&format!("GPA:           {}\n", field(&profile.gpa)));
    out.push_str("\n=== Skills & Interests ===\n");
    out.push_str(&format!("Skills:    {}\n", field(&profile.skills)));
    out.push_str(&format!("Interests: {}\n", field(&profile.interests)));
    out
}

/// Applications table, newest first
pub fn render_applications(applications: &[Application]) -> String {
    if applications.is_empty() {
        return MSG_NO_APPLICATIONS.to_string();
    }

    let rows = applications
        .iter()
        .sorted_by(|a, b| b.date_applied.cmp(&a.date_applied))
        .map(|app| {
            (
                app.position.as_str(),
                app.company.as_str(),
                format_api_date(&app.date_applied),
                app.status.as_str(),
            )
        })
        .collect::<Vec<_>>();

    let position_width = rows
        .iter()
        .map(|r| r.0.chars().count())
        .chain(std::iter::once("Position".len()))
        .max()
        .unwrap_or(0);
    let company_width = rows
        .iter()
        .map(|r| r.1.chars().count())
        .chain(std::iter::once("Company".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<pw$}  {:<cw$}  {:<10}  {}\n",
        "Position",
        "Company",
        "Applied",
        "Status",
        pw = position_width,
        cw = company_width
    );
    for (position, company, date, status) in rows {
        out.push_str(&format!(
            "{:<pw$}  {:<cw$}  {:<10}  {}\n",
            position,
            company,
            date,
            status,
            pw = position_width,
            cw = company_width
        ));
    }
    out
}
