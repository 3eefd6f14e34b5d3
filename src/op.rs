//! Subcommands understood by `cli-shell-api`.

use std::fmt;

/// One query against the configuration store, mapped 1:1 to a subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Exists,
    ExistsActive,
    SessionChanged,
    SessionUnsaved,
    InSession,
    IsMulti,
    IsTag,
    IsLeaf,
    ReturnValue,
    ReturnActiveValue,
    ReturnValues,
    ReturnActiveValues,
    ListNodes,
    ListActiveNodes,
}

impl Operation {
    /// The exact (case-sensitive) subcommand name passed to the tool.
    pub fn subcommand(self) -> &'static str {
        match self {
            Operation::Exists => "exists",
            Operation::ExistsActive => "existsActive",
            Operation::SessionChanged => "sessionChanged",
            Operation::SessionUnsaved => "sessionUnsaved",
            Operation::InSession => "inSession",
            Operation::IsMulti => "isMulti",
            Operation::IsTag => "isTag",
            Operation::IsLeaf => "isLeaf",
            Operation::ReturnValue => "returnValue",
            Operation::ReturnActiveValue => "returnActiveValue",
            Operation::ReturnValues => "returnValues",
            Operation::ReturnActiveValues => "returnActiveValues",
            Operation::ListNodes => "listNodes",
            Operation::ListActiveNodes => "listActiveNodes",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}
