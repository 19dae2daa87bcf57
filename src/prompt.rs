use colored::Colorize;
use inquire::Confirm;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("Error occurred trying to prompt user")]
    #[diagnostic(
        code(unfurl::prompt::inquire),
        help("Run without --confirm when stdin is not a terminal")
    )]
    Inquire(#[from] inquire::InquireError),
}

/// Asks whether the previewed tree should be written.
pub fn apply_changes() -> Result<bool, PromptError> {
    let answer = Confirm::new(&format!("{}", "Write these files?".bright_green()))
        .with_default(false)
        .with_help_message("Existing files at the same paths are overwritten")
        .prompt()?;

    Ok(answer)
}
