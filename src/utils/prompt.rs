use crate::error::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

/// Interactive yes/no question on the controlling terminal.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Free-form search term prompt. Empty input is allowed and means
/// "match everything".
pub fn input_keyword(prompt: &str) -> Result<String> {
    Ok(Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}
