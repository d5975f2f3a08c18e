//! Console commands for listing and running seeders.

mod list;
mod seed;

use std::io::{self, Write};

pub use list::SeedListCommand;
pub use seed::SeedCommand;

/// Line-oriented console output with a verbosity level.
pub struct ConsoleIo<W> {
    out: W,
    verbosity: u8,
}

impl<W: Write> ConsoleIo<W> {
    pub fn new(out: W) -> Self {
        Self { out, verbosity: 0 }
    }

    pub fn with_verbosity(mut self, level: u8) -> Self {
        self.verbosity = level;
        self
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity > 0
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "[ERROR] {message}")
    }

    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    pub fn new_line(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Writes a bordered table; short rows are padded with empty cells.
    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
        let columns = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0; columns];
        for (i, header) in headers.iter().enumerate() {
            widths[i] = widths[i].max(header.chars().count());
        }
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let border: String = widths
            .iter()
            .map(|w| format!("+{}", "-".repeat(w + 2)))
            .collect::<String>()
            + "+";

        writeln!(self.out, "{border}")?;
        self.table_row(&widths, headers.iter().copied())?;
        writeln!(self.out, "{border}")?;
        for row in rows {
            self.table_row(&widths, row.iter().map(String::as_str))?;
        }
        writeln!(self.out, "{border}")
    }

    fn table_row<'a>(
        &mut self,
        widths: &[usize],
        cells: impl Iterator<Item = &'a str>,
    ) -> io::Result<()> {
        let mut cells = cells;
        for &width in widths {
            let cell = cells.next().unwrap_or("");
            write!(self.out, "| {cell:<width$} ")?;
        }
        writeln!(self.out, "|")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(io: ConsoleIo<Vec<u8>>) -> String {
        String::from_utf8(io.into_inner()).unwrap()
    }

    #[test]
    fn test_table() {
        let mut io = ConsoleIo::new(Vec::new());
        io.table(&["Seeder Name"], &[vec!["users".to_string()]])
            .unwrap();

        assert_eq!(
            output(io),
            "+-------------+\n\
             | Seeder Name |\n\
             +-------------+\n\
             | users       |\n\
             +-------------+\n"
        );
    }

    #[test]
    fn test_table_pads_short_rows() {
        let mut io = ConsoleIo::new(Vec::new());
        io.table(&["A", "B"], &[vec!["x".to_string()]]).unwrap();

        assert!(output(io).contains("| x |   |"));
    }

    #[test]
    fn test_error_prefix() {
        let mut io = ConsoleIo::new(Vec::new());
        io.error("Seeder foo not found").unwrap();

        assert_eq!(output(io), "[ERROR] Seeder foo not found\n");
    }

    #[test]
    fn test_verbosity() {
        let io = ConsoleIo::new(Vec::new());
        assert!(!io.is_verbose());
        assert!(io.with_verbosity(1).is_verbose());
    }
}
