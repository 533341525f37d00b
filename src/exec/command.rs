// src/exec/command.rs

use std::fmt;

use crate::errors::RequestError;

/// An executable program plus its argument vector.
///
/// Immutable once built. It is handed to the OS as-is: no shell ever sees
/// it, so metacharacters in any argument stay literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCommand {
    program: String,
    args: Vec<String>,
}

impl ScanCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ScanCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg:?}")?;
        }
        Ok(())
    }
}

/// Fixed command line with one slot for the target URL:
///
/// `<program> <args...> [<url_flag>] <url> <trailing_args...>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
    url_flag: Option<String>,
    trailing_args: Vec<String>,
}

impl CommandTemplate {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        url_flag: Option<String>,
        trailing_args: Vec<String>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            url_flag,
            trailing_args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Substitute `locator` into the template.
    ///
    /// Fails only when the locator is empty or whitespace.
    pub fn build(&self, locator: &str) -> Result<ScanCommand, RequestError> {
        if locator.trim().is_empty() {
            return Err(RequestError::MissingLocator);
        }

        let mut args = Vec::with_capacity(self.args.len() + self.trailing_args.len() + 2);
        args.extend(self.args.iter().cloned());
        if let Some(flag) = &self.url_flag {
            args.push(flag.clone());
        }
        args.push(locator.to_string());
        args.extend(self.trailing_args.iter().cloned());

        Ok(ScanCommand::new(self.program.clone(), args))
    }
}
