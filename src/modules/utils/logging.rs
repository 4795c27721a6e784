use env_logger::{Builder, WriteStyle};
use log::{error, info, warn, LevelFilter};
use std::fs::OpenOptions;
use std::path::Path;

/// Initialize the logging system, writing to the given log file
pub fn initialize_logging(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Create or append to the log file
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    Builder::new()
        .filter_level(LevelFilter::Info)
        // RUST_LOG still wins over the default level
        .parse_env("RUST_LOG")
        .format_timestamp_secs()
        .format_module_path(true)
        .write_style(WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    info!("Logging system initialized");
    Ok(())
}

/// Mask the middle of a sensitive value (emails, names) for log output
pub fn format_sensitive(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Structured logging for password reset steps
pub fn log_reset_event(step: &str, email: &str, success: bool, details: Option<&str>) {
    if success {
        info!(
            "Reset event: step={}, email={}, success=true, timestamp={}, details={:?}",
            step,
            format_sensitive(email),
            timestamp(),
            details
        );
    } else {
        warn!(
            "Reset event: step={}, email={}, success=false, timestamp={}, details={:?}",
            step,
            format_sensitive(email),
            timestamp(),
            details
        );
    }
}

/// Structured logging for login/signup/logout and other session changes
pub fn log_session_event(event_type: &str, user: &str, success: bool, details: Option<&str>) {
    if success {
        info!(
            "Session event: type={}, user={}, success=true, timestamp={}, details={:?}",
            event_type,
            format_sensitive(user),
            timestamp(),
            details
        );
    } else {
        warn!(
            "Session event: type={}, user={}, success=false, timestamp={}, details={:?}",
            event_type,
            format_sensitive(user),
            timestamp(),
            details
        );
    }
}

/// Add structured logging for data operations
pub fn log_data_operation(
    operation: &str,
    user: &str,
    resource: &str,
    success: bool,
    details: Option<&str>,
) {
    if success {
        info!(
            "Data operation: op={}, user={}, resource={}, success=true, timestamp={}, details={:?}",
            operation,
            format_sensitive(user),
            resource,
            timestamp(),
            details
        );
    } else {
        error!(
            "Data operation: op={}, user={}, resource={}, success=false, timestamp={}, details={:?}",
            operation,
            format_sensitive(user),
            resource,
            timestamp(),
            details
        );
    }
}

/// Log the result of one HTTP exchange with the portal API.
/// `status` is `None` when no response was received at all.
pub fn log_api_call(method: &str, path: &str, status: Option<u16>, details: Option<&str>) {
    match status {
        Some(code) if (200..300).contains(&code) => {
            info!(
                "API call: method={}, path={}, status={}, timestamp={}",
                method,
                path,
                code,
                timestamp()
            );
        }
        Some(code) => {
            warn!(
                "API call: method={}, path={}, status={}, timestamp={}, details={:?}",
                method,
                path,
                code,
                timestamp(),
                details
            );
        }
        None => {
            error!(
                "API call: method={}, path={}, status=none, timestamp={}, details={:?}",
                method,
                path,
                timestamp(),
                details
            );
        }
    }
}
