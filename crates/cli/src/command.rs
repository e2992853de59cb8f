//! Interactive command grammar.
//!
//! | Input              | Command                |
//! |--------------------|------------------------|
//! | `q`                | [`Command::Quit`]      |
//! | `clear`            | [`Command::Clear`]     |
//! | empty line         | [`Command::Noop`]      |
//! | `D`                | [`Command::Defaults`]  |
//! | `cityA, cityB,...` | [`Command::Regions`]   |
//!
//! Keywords match exactly (case-sensitive, no surrounding spaces); only the
//! line terminator is stripped.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Clear,
    Noop,
    Defaults,
    /// Trimmed region tokens as typed; resolution lowercases them.
    Regions(Vec<String>),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\n', '\r']);
        match line {
            "q" => Self::Quit,
            "clear" => Self::Clear,
            "" => Self::Noop,
            "D" => Self::Defaults,
            _ => Self::Regions(split_tokens(line)),
        }
    }
}

/// Split a comma-separated region list, trimming each token and dropping
/// blanks.
pub fn split_tokens(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
