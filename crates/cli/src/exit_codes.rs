//! CLI Exit Code Registry
//!
//! Single source of truth for `rostercheck` exit codes. Scheduled jobs and
//! wrapper scripts branch on these, so they are part of the shell contract.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success: nothing in the priority window needs action      |
//! | 1    | Needs action: at least one priority item                  |
//! | 2    | Usage error (bad arguments, malformed `--today`)          |
//! | 3    | Invalid config (TOML syntax or validation)                |
//! | 4    | Runtime error (unreadable or unparseable input, output)   |

/// Run completed; the priority list is empty.
pub const EXIT_SUCCESS: u8 = 0;

/// Run completed and the priority list is non-empty.
/// Like `diff(1)`, exit 1 means "something differs", not "crashed".
pub const EXIT_NEEDS_ACTION: u8 = 1;

/// Bad arguments. clap also exits with 2 on its own parse failures.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input or output file could not be read, parsed, or written.
pub const EXIT_RUNTIME: u8 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_NEEDS_ACTION, EXIT_USAGE, EXIT_INVALID_CONFIG, EXIT_RUNTIME];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
