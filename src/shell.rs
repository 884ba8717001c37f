//! Line-oriented front end: reads statements, handles meta commands, prints results.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::database::Database;
use crate::sample::SAMPLE_HINTS;

const PROMPT: &str = "simpledb> ";

const BANNER: &str = "\
========================================
      Welcome to SimpleDB v1.0
========================================

Type 'help' for available commands
Type 'exit' or 'quit' to exit
";

const HELP: &str = "\
Available Commands:
==================
CREATE TABLE <name> (<col1> <type1>, <col2> <type2>, ...)
  - Creates a new table with specified columns
  - Supported types: int, double, string, bool
  - Example: CREATE TABLE users (id int, name string, age int)

INSERT INTO <table> VALUES (<val1>, <val2>, ...)
  - Inserts a new row into the table
  - Example: INSERT INTO users VALUES (1, John, 25)

SELECT * FROM <table> [WHERE <column> <op> <value>]
SELECT <col1>, <col2> FROM <table> [WHERE <column> <op> <value>]
  - Selects data from a table; <op> is one of = != < > <= >=
  - Example: SELECT * FROM users WHERE age > 20

DROP TABLE <table>
  - Removes a table and all its data

SHOW TABLES
  - Lists all tables in the database

DESCRIBE <table> or DESC <table>
  - Shows the structure of a table

Other Commands:
  help     - Show this help message
  info     - Show database information
  clear    - Clear the screen
  exit     - Exit the database
";

/// ANSI sequence: clear screen, cursor home.
const CLEAR: &str = "\x1b[2J\x1b[H";

/// What the shell does after a line.
#[derive(Debug, PartialEq, Eq)]
enum Control {
    Continue,
    Exit,
}

/// Reads lines from `input` and writes everything to `output`.
pub struct Shell<R, W> {
    db: Database,
    input: R,
    output: W,
    quiet: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(db: Database, input: R, output: W) -> Self {
        Self {
            db,
            input,
            output,
            quiet: false,
        }
    }

    /// Without banner or prompt, for scripts piped on stdin.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn into_database(self) -> Database {
        self.db
    }

    /// Prints the sample hints; used after loading the sample data.
    pub fn print_hints(&mut self) -> io::Result<()> {
        writeln!(self.output, "Sample data loaded successfully!")?;
        for hint in SAMPLE_HINTS {
            writeln!(self.output, "Try: {hint}")?;
        }
        writeln!(self.output)
    }

    /// Runs until `exit`, `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        if !self.quiet {
            writeln!(self.output, "{BANNER}")?;
        }

        let mut line = String::new();
        loop {
            if !self.quiet {
                write!(self.output, "{PROMPT}")?;
                self.output.flush()?;
            }

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                debug!("end of input");
                break;
            }
            if self.handle_line(line.trim())? == Control::Exit {
                break;
            }
        }
        self.output.flush()
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Control> {
        if line.is_empty() {
            return Ok(Control::Continue);
        }

        match line.to_lowercase().as_str() {
            "exit" | "quit" => {
                writeln!(self.output, "Goodbye!")?;
                return Ok(Control::Exit);
            }
            "help" => writeln!(self.output, "{HELP}")?,
            "info" => writeln!(self.output, "{}", self.db.info())?,
            "clear" => write!(self.output, "{CLEAR}{BANNER}")?,
            _ => self.db.execute_query(line, &mut self.output)?,
        }

        if !self.quiet {
            writeln!(self.output)?;
        }
        Ok(Control::Continue)
    }
}
