use clap::{Arg, ArgMatches, Command}; // Command-line argument parsing
use log::{error, info};
use std::path::PathBuf;
use std::process;

use internlink_client::api::{ApiClient, Application, Profile};
use internlink_client::config::Config;
use internlink_client::portal::display::{render_applications, render_profile, render_welcome};
use internlink_client::portal::user_interface::{prompt_login, prompt_profile, prompt_signup};
use internlink_client::portal::{run_reset_wizard, PortalError, SessionContext, WizardResult};
use internlink_client::reset::ResetFlowController;
use internlink_client::utils::logging::initialize_logging;

fn cli() -> Command {
    Command::new("internlink")
        .about("Command-line client for the InternLink student internship portal")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .help("Base URL of the portal API")
                .value_name("URL"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a JSON config file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .global(true)
                .help("Seconds to wait for each server response")
                .value_name("SECS"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .about("Log in to your student account")
                .arg(Arg::new("email").long("email").help("Account email")),
        )
        .subcommand(Command::new("signup").about("Create a new student account"))
        .subcommand(Command::new("logout").about("Log out and forget the saved session"))
        .subcommand(Command::new("whoami").about("Show the logged-in student"))
        .subcommand(
            Command::new("forgot")
                .about("Reset a forgotten password")
                .arg(Arg::new("email").long("email").help("Account email")),
        )
        .subcommand(Command::new("profile").about("Show your profile"))
        .subcommand(Command::new("profile-save").about("Create or update your profile"))
        .subcommand(Command::new("applications").about("List your internship applications"))
        .subcommand(
            Command::new("apply")
                .about("Apply for an internship")
                .arg(
                    Arg::new("position")
                        .help("The position to apply for")
                        .required(true),
                )
                .arg(
                    Arg::new("company")
                        .help("The company offering it")
                        .required(true),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<Config, String> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config = Config::load(path.map(PathBuf::as_path)).map_err(|e| e.to_string())?;
    config
        .apply_overrides(
            matches.get_one::<String>("api-url").cloned(),
            matches.get_one::<String>("timeout").cloned(),
        )
        .map_err(|e| e.to_string())?;
    Ok(config)
}

/// Fail unless a student is logged in
fn require_login(session: &SessionContext) -> Result<(), PortalError> {
    if session.is_logged_in() {
        Ok(())
    } else {
        Err(PortalError::Validation(
            "You are not logged in. Run 'internlink login' first.".to_string(),
        ))
    }
}

/// Refresh the profile and applications, then apply against that fresh state
async fn submit_application(
    session: &mut SessionContext,
    client: &ApiClient,
    position: &str,
    company: &str,
) -> Result<Application, PortalError> {
    session.load_user_data(client).await?;
    let application = session.apply(client, position, company).await?;
    Ok(application.clone())
}

async fn run(matches: ArgMatches, config: Config) -> Result<(), PortalError> {
    let client = ApiClient::new(config.api_url.clone(), config.request_timeout())
        .map_err(|_| PortalError::Transport)?;
    let session_file = config.session_file.clone();
    let mut session = SessionContext::load(&session_file)?;

    match matches.subcommand() {
        Some(("login", sub_matches)) => {
            let (email, password) = prompt_login(sub_matches.get_one::<String>("email").cloned())?;
            let user = session.login(&client, &email, &password).await?;
            println!("{}", render_welcome(user));
            session.save(&session_file)?;
        }
        Some(("signup", _)) => {
            let form = prompt_signup()?;
            let user = session.signup(&client, &form).await?;
            println!("Account created. {}", render_welcome(user));
            session.save(&session_file)?;
        }
        Some(("logout", _)) => {
            session.logout();
            SessionContext::discard(&session_file)?;
            println!("Logged out.");
        }
        Some(("whoami", _)) => match &session.current_user {
            Some(user) => println!("{} <{}>", user.full_name(), user.email),
            None => println!("Not logged in."),
        },
        Some(("forgot", sub_matches)) => {
            let controller = ResetFlowController::new(client, config.request_timeout());
            let email = sub_matches.get_one::<String>("email").cloned();
            match run_reset_wizard(&controller, email).await? {
                WizardResult::Completed => {
                    println!("You can now log in with 'internlink login'.");
                }
                WizardResult::Cancelled => println!("Password reset cancelled."),
            }
        }
        Some(("profile", _)) => {
            require_login(&session)?;
            session.load_user_data(&client).await?;
            session.save(&session_file)?;
            if let Some(user) = &session.current_user {
                println!("{}", render_profile(user, session.profile.as_ref()));
            }
        }
        Some(("profile-save", _)) => {
            require_login(&session)?;
            let profile: Profile = prompt_profile(session.profile.as_ref())?;
            session.save_profile(&client, profile).await?;
            session.save(&session_file)?;
            println!("Profile saved successfully!");
        }
        Some(("applications", _)) => {
            require_login(&session)?;
            session.load_user_data(&client).await?;
            session.save(&session_file)?;
            println!("{}", render_applications(&session.applications));
        }
        Some(("apply", sub_matches)) => {
            require_login(&session)?;
            let position = sub_matches
                .get_one::<String>("position")
                .map(String::as_str)
                .unwrap_or_default();
            let company = sub_matches
                .get_one::<String>("company")
                .map(String::as_str)
                .unwrap_or_default();
            let application = submit_application(&mut session, &client, position, company).await?;
            println!(
                "Application submitted successfully! ({} at {}, status: {})",
                application.position, application.company, application.status
            );
            session.save(&session_file)?;
        }
        _ => unreachable!("subcommand_required is set"),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(2);
        }
    };

    if let Err(e) = initialize_logging(&config.log_file) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    info!("Using portal API at {}", config.api_url);

    if let Err(e) = run(matches, config).await {
        error!("Command failed: {}", e);
        eprintln!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use internlink_client::api::User;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_apply_requires_position_and_company() {
        assert!(cli().try_get_matches_from(["internlink", "apply", "Intern"]).is_err());
        let matches = cli()
            .try_get_matches_from(["internlink", "apply", "Intern", "Acme", "--api-url", "http://x"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("api-url").map(String::as_str),
            Some("http://x")
        );
    }

    #[test]
    fn test_overrides_from_flags() {
        let matches = cli()
            .try_get_matches_from(["internlink", "--timeout", "4", "whoami"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.request_timeout_secs, 4);

        let matches = cli()
            .try_get_matches_from(["internlink", "--timeout", "never", "whoami"])
            .unwrap();
        assert!(load_config(&matches).is_err());
    }

    #[tokio::test]
    async fn test_apply_refreshes_stale_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_id": 4,
                "university": "Strathmore"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/applications/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/apply"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 9,
                "user_id": 4,
                "position": "Backend Intern",
                "company": "Twiga",
                "status": "Pending",
                "date_applied": "2024-03-06 09:00:00"
            })))
            .expect(1)
            .mount(&server)
            .await;

        // Logged in, but the profile was never loaded
        let mut session = SessionContext {
            current_user: Some(User {
                id: 4,
                first_name: "Amina".to_string(),
                last_name: "Otieno".to_string(),
                email: "amina@example.com".to_string(),
                user_type: "student".to_string(),
            }),
            ..SessionContext::default()
        };
        let client = ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap();

        let application = submit_application(&mut session, &client, "Backend Intern", "Twiga")
            .await
            .unwrap();
        assert_eq!(application.id, 9);
        assert!(session.has_complete_profile());
        assert_eq!(session.applications.len(), 1);
    }
}
