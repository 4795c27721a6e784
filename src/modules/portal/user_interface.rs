// Interactive prompts for the session shell and the password reset wizard
use std::io;

use super::session::SignupForm;
use crate::modules::api::Profile;
use crate::modules::reset::{FormLayout, Phase, ResetFlowController, ResetGateway, ResetInput};
use crate::modules::utils::io::{prompt, prompt_password, prompt_with_default};

/// How the reset wizard ended
#[derive(Debug, PartialEq, Eq)]
pub enum WizardResult {
    Completed, // Password changed, go back to login
    Cancelled, // User typed 'back' or 'cancel'
}

/// Navigation words accepted at any wizard prompt
fn is_cancel_command(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "back" | "cancel")
}

/// Interpret a wizard answer: `None` means leave the wizard, either because the
/// user asked to or because there is no more input to read
fn answer_or_cancel(answer: io::Result<String>) -> io::Result<Option<String>> {
    match answer {
        Ok(answer) if is_cancel_command(&answer) => Ok(None),
        Ok(answer) => Ok(Some(answer)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

/// Walk the user through the reset flow until it completes or they cancel.
/// `email` pre-fills the first step.
pub async fn run_reset_wizard<G: ResetGateway>(
    controller: &ResetFlowController<G>,
    email: Option<String>,
) -> io::Result<WizardResult> {
    controller.start();
    let mut preset_email = email;

    println!("\n=== Password Reset ===");
    println!("(Type 'back' or 'cancel' at any prompt to return)");

    loop {
        let session = controller.snapshot();
        let layout = FormLayout::for_phase(session.phase());

        if layout.return_to_login {
            println!("Returning to login...");
            return Ok(WizardResult::Completed);
        }
        if layout.email_locked {
            println!("\nEmail: {} (locked)", session.email());
        }
        if let Some(label) = layout.submit_label {
            println!("\n[{}]", label);
        }

        let input = match session.phase() {
            Phase::AwaitingEmail => {
                let answer = match preset_email.take() {
                    Some(email) => {
                        println!("Email: {}", email);
                        Ok(email)
                    }
                    None => prompt("Email"),
                };
                match answer_or_cancel(answer)? {
                    Some(email) => ResetInput::Email(email),
                    None => return Ok(cancel(controller)),
                }
            }
            Phase::AwaitingCode => {
                match answer_or_cancel(prompt("Reset code"))? {
                    Some(code) => ResetInput::Code(code),
                    None => return Ok(cancel(controller)),
                }
            }
            Phase::AwaitingNewPassword => {
                let new_password = match answer_or_cancel(prompt_password("New password"))? {
                    Some(password) => password,
                    None => return Ok(cancel(controller)),
                };
                let confirm_password =
                    match answer_or_cancel(prompt_password("Confirm new password"))? {
                        Some(password) => password,
                        None => return Ok(cancel(controller)),
                    };
                ResetInput::NewPassword {
                    new_password,
                    confirm_password,
                }
            }
            Phase::Completed => return Ok(WizardResult::Completed),
        };

        let outcome = controller.submit(input).await;
        if outcome.ok {
            println!("{}", outcome.message);
        } else {
            println!("Error: {}", outcome.message);
        }
    }
}

fn cancel<G: ResetGateway>(controller: &ResetFlowController<G>) -> WizardResult {
    controller.start();
    WizardResult::Cancelled
}

/// Ask for login credentials
pub fn prompt_login(email: Option<String>) -> io::Result<(String, String)> {
    println!("\n=== Login ===");
    let email = match email {
        Some(email) => email,
        None => prompt("Email")?,
    };
    let password = prompt_password("Password")?;
    Ok((email, password))
}

/// Ask for the signup form fields
pub fn prompt_signup() -> io::Result<SignupForm> {
    println!("\n=== Create Account ===");
    Ok(SignupForm {
        first_name: prompt("First name")?,
        last_name: prompt("Last name")?,
        email: prompt("Email")?,
        password: prompt_password("Password (min 8 characters)")?,
        confirm_password: prompt_password("Confirm password")?,
    })
}

/// Ask for every profile field, offering the current values as defaults
pub fn prompt_profile(current: Option<&Profile>) -> io::Result<Profile> {
    println!("\n=== Student Profile ===");
    println!("(Press Enter to keep the value in brackets)");
    let existing = current.cloned().unwrap_or_default();

    let ask = |label: &str, value: &Option<String>| -> io::Result<Option<String>> {
        let answer = prompt_with_default(label, value.as_deref().unwrap_or(""))?;
        Ok(if answer.is_empty() { None } else { Some(answer) })
    };

    Ok(Profile {
        phone: ask("Phone", &existing.phone)?,
        university: ask("University", &existing.university)?,
        course: ask("Course", &existing.course)?,
        year: ask("Year of study", &existing.year)?,
        gpa: ask("GPA", &existing.gpa)?,
        skills: ask("Skills", &existing.skills)?,
        interests: ask("Interests", &existing.interests)?,
        ..existing.clone()
    })
}
