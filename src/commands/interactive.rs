//! Interactive user prompting components
//!
//! The CLI counterpart of the confirmation dialog: every row action asks
//! before it reaches the backend unless `--yes` is given.

use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::{CatalogError, Result};

/// Prompt user for yes/no confirmation
///
/// # Arguments
/// * `prompt` - The question to display, without the `[y/N]` suffix
///
/// # Returns
/// * `true` if user confirms with 'y' or 'yes'
/// * `false` otherwise
pub fn confirm(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    confirm_with(prompt, &mut stdin.lock(), &mut io::stdout())
}

fn confirm_with(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    write!(output, "{} [y/N] ", prompt.trim_end())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Confirm an action unless `assume_yes` is set.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
/// Declining returns [`CatalogError::Aborted`].
pub fn require_confirmation(prompt: &str, assume_yes: bool) -> Result<()> {
    if assume_yes {
        return Ok(());
    }
    if !io::stdin().is_terminal() {
        return Err(CatalogError::InvalidArgument {
            key: "yes".to_string(),
            message: "stdin is not a terminal; pass --yes to confirm".to_string(),
        });
    }
    if confirm(prompt)? {
        Ok(())
    } else {
        Err(CatalogError::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(input: &str) -> (bool, String) {
        let mut reader = io::Cursor::new(input.as_bytes().to_vec());
        let mut written = Vec::new();
        let confirmed =
            confirm_with("Are you sure you want to delete this user?", &mut reader, &mut written)
                .unwrap();
        (confirmed, String::from_utf8(written).unwrap())
    }

    #[test]
    fn test_yes_answers() {
        assert!(answer("y\n").0);
        assert!(answer("YES\n").0);
    }

    #[test]
    fn test_anything_else_declines() {
        assert!(!answer("\n").0);
        assert!(!answer("nope\n").0);
        assert!(!answer("").0);
    }

    #[test]
    fn test_prompt_text() {
        assert_eq!(
            answer("n\n").1,
            "Are you sure you want to delete this user? [y/N] "
        );
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        assert!(require_confirmation("Delete?", true).is_ok());
    }
}
