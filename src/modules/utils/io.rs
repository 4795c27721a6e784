use std::io::{self, BufRead, Write};

/// Helper function to read a line from stdin
pub fn read_line() -> io::Result<String> {
    read_line_from(&mut io::stdin().lock())
}

/// Read one trimmed line; a closed input is `UnexpectedEof`, not an empty answer
fn read_line_from<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed",
        ));
    }
    Ok(input.trim().to_string())
}

/// Print a prompt on the same line and read the answer
pub fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    read_line()
}

/// Like `prompt`, but falls back to `default` when the answer is empty
pub fn prompt_with_default(label: &str, default: &str) -> io::Result<String> {
    if default.is_empty() {
        return prompt(label);
    }
    print!("{} [{}]: ", label, default);
    io::stdout().flush()?;
    let answer = read_line()?;
    Ok(pick_answer(answer, default))
}

/// Read a password without echoing it to the terminal
pub fn prompt_password(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    rpassword::read_password()
}

fn pick_answer(answer: String, default: &str) -> String {
    if answer.is_empty() {
        default.to_string()
    } else {
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_answer() {
        assert_eq!(pick_answer(String::new(), "Nairobi Uni"), "Nairobi Uni");
        assert_eq!(pick_answer("MIT".to_string(), "Nairobi Uni"), "MIT");
        assert_eq!(pick_answer(String::new(), ""), "");
    }

    #[test]
    fn test_read_line_stops_at_end_of_input() {
        let mut input = io::Cursor::new("  alice@example.com \n\n");
        assert_eq!(read_line_from(&mut input).unwrap(), "alice@example.com");
        assert_eq!(read_line_from(&mut input).unwrap(), "");

        let err = read_line_from(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
