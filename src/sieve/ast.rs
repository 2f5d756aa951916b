/// AST for the flat command subset of SIEVE (RFC 5228 §2.9).
///
/// Only simple commands are modelled: `identifier argument* ";"`.
/// Control structures and tests are outside this subset and are rejected
/// by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub commands: Vec<Command>,
}

impl Script {
    /// Find the first command with the given identifier (case-insensitive).
    pub fn command(&self, identifier: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.identifier.eq_ignore_ascii_case(identifier))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub identifier: String,
    pub arguments: Vec<Argument>,
}

impl Command {
    /// The argument immediately following `tag`, if the tag is present.
    pub fn tagged(&self, tag: &str) -> Option<&Argument> {
        let idx = self
            .arguments
            .iter()
            .position(|a| matches!(a, Argument::Tag(t) if t == tag))?;
        self.arguments.get(idx + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// `:days`, `:subject`, ... (stored lowercased, with the colon)
    Tag(String),
    Number(u64),
    /// Quoted or multi-line string, already unescaped.
    String(String),
    StringList(Vec<String>),
}

impl Argument {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}
