// Reporting and output for authorisation-check
// Line-oriented progress text; exposed routes are highlighted in red on a
// terminal

use crate::error::ProbeError;
use crate::models::ProbeResult;
use std::io::{self, IsTerminal, Write};

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Receives progress of an audit run as it happens.
pub trait Reporter {
    fn routes_found(&mut self, count: usize) -> io::Result<()>;
    fn trying(&mut self, route: &str) -> io::Result<()>;
    fn exposed(&mut self, result: &ProbeResult) -> io::Result<()>;
    fn failed(&mut self, route: &str, error: &ProbeError) -> io::Result<()>;
    fn done(&mut self) -> io::Result<()>;
}

pub fn exposed_message(result: &ProbeResult) -> String {
    format!(
        "Route {} is accessible without authorisation, statusCode : {}, url : {}",
        result.route, result.status, result.final_url
    )
}

pub struct ConsoleReporter<W: Write> {
    out: W,
    highlight: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        let out = io::stdout();
        let highlight = out.is_terminal();
        Self { out, highlight }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, highlight: bool) -> Self {
        Self { out, highlight }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn routes_found(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.out, "Found {} routes", count)?;
        writeln!(self.out, "Checking routes...")
    }

    fn trying(&mut self, route: &str) -> io::Result<()> {
        writeln!(self.out, "Trying route {}", route)
    }

    fn exposed(&mut self, result: &ProbeResult) -> io::Result<()> {
        if self.highlight {
            writeln!(self.out, "{}{}{}", RED, exposed_message(result), RESET)
        } else {
            writeln!(self.out, "{}", exposed_message(result))
        }
    }

    fn failed(&mut self, _route: &str, error: &ProbeError) -> io::Result<()> {
        writeln!(self.out, "{}", error)
    }

    fn done(&mut self) -> io::Result<()> {
        writeln!(self.out, "Done!")?;
        self.out.flush()
    }
}
