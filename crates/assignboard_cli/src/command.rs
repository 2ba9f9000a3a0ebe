//! Prompt commands, parsed with the same clap derive as process arguments.

use clap::{Parser, Subcommand};

/// One line typed at the prompt.
#[derive(Parser, Debug)]
#[command(name = "assignboard", no_binary_name = true, disable_version_flag = true)]
pub struct PromptLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the board
    #[command(visible_alias = "ls")]
    Show,

    /// Move a pool item into a group
    #[command(visible_alias = "mv")]
    Move {
        /// Id of the item being moved
        item_id: i64,
        /// Current position of the item in the pool
        pool_index: usize,
        /// Drop slot among groups; past the end means the last group
        group_index: usize,
    },

    /// Return the most recently moved item to the pool
    Undo,

    /// Expand or collapse a group
    Toggle {
        /// Position of the group on the board
        group_index: usize,
    },

    /// Write the board to the snapshot file and clear undo history
    Save,

    /// Leave the prompt without saving
    #[command(visible_alias = "exit")]
    Quit,
}

/// Parses one prompt line. Blank lines yield `None`.
///
/// # Errors
/// Returns clap's error for unknown commands, bad arguments and `help`
/// requests; its `Display` is the text to show the user.
pub fn parse_line(line: &str) -> Result<Option<Command>, clap::Error> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    PromptLine::try_parse_from(line.split_whitespace()).map(|parsed| Some(parsed.command))
}

#[cfg(test)]
mod tests {
    use super::{parse_line, Command, PromptLine};
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn prompt_definition_is_consistent() {
        PromptLine::command().debug_assert();
    }

    #[test]
    fn parses_move_with_three_numbers() {
        assert_eq!(
            parse_line("move 3 0 1").unwrap(),
            Some(Command::Move {
                item_id: 3,
                pool_index: 0,
                group_index: 1
            })
        );
        assert_eq!(
            parse_line("mv 4 1 9").unwrap(),
            Some(Command::Move {
                item_id: 4,
                pool_index: 1,
                group_index: 9
            })
        );
    }

    #[test]
    fn rejects_move_with_missing_arguments() {
        let err = parse_line("mv 3 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_non_numeric_index() {
        let err = parse_line("toggle first").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn blank_line_is_skipped_and_unknown_command_is_an_error() {
        assert_eq!(parse_line("   \n").unwrap(), None);
        let err = parse_line("drag 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn help_is_rendered_by_clap() {
        let err = parse_line("help").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("toggle"));
    }

    #[test]
    fn aliases_resolve_to_commands() {
        assert_eq!(parse_line("ls").unwrap(), Some(Command::Show));
        assert_eq!(parse_line("exit").unwrap(), Some(Command::Quit));
        assert_eq!(parse_line("undo").unwrap(), Some(Command::Undo));
    }
}
