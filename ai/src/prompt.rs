//! Prompt sent to the language model.

/// Builds the instruction prompt for `program`.
///
/// The model is asked to answer with one record per line so the reply can be
/// read by [`parse_reply`](crate::parse_reply) without any JSON parsing.
pub fn build_prompt(program: &str, shell: &str) -> String {
    format!(
        r#"You are a shell completion expert. Generate a list of CLI flags and subcommands for the program "{program}".

Respond ONLY in this exact format, one per line:
FLAG|short|long|description|takes_arg
SUBCOMMAND|name|description

Where:
- short is the short flag like -u (or empty)
- long is the long flag like --url (or empty)
- takes_arg is true or false
- For SUBCOMMAND lines, name is the subcommand name

Example:
FLAG|-u|--url|The target URL|true
FLAG|-v||Enable verbose output|false
SUBCOMMAND|dir|Directory enumeration mode

Now generate completions for: {program}
Target shell: {shell}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_program_and_shell() {
        let prompt = build_prompt("gobuster", "fish");
        assert!(prompt.contains("for the program \"gobuster\""));
        assert!(prompt.contains("FLAG|short|long|description|takes_arg"));
        assert!(prompt.contains("SUBCOMMAND|name|description"));
        assert!(prompt.ends_with("Target shell: fish"));
    }
}
