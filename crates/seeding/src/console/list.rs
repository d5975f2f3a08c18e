use std::io::Write;

use super::ConsoleIo;
use crate::error::SeedingResult;
use crate::registry::Seeders;

/// `seed:list`: prints the registered seeder names.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedListCommand;

impl SeedListCommand {
    pub fn handle<W: Write>(&self, io: &mut ConsoleIo<W>, seeders: &Seeders) -> SeedingResult<i32> {
        let rows: Vec<Vec<String>> = seeders.names().into_iter().map(|n| vec![n]).collect();
        io.table(&["Seeder Name"], &rows)?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeder::StaticSeeder;
    use std::sync::Arc;

    #[test]
    fn test_lists_names() {
        let mut seeders = Seeders::default();
        seeders
            .add_seeder("foo", Arc::new(StaticSeeder::default()))
            .add_lazy("bar", |_| Ok(Arc::new(StaticSeeder::default())));
        let mut io = ConsoleIo::new(Vec::new());

        let code = SeedListCommand.handle(&mut io, &seeders).unwrap();
        let output = String::from_utf8(io.into_inner()).unwrap();

        assert_eq!(code, 0);
        assert!(output.contains("| Seeder Name |"));
        assert!(output.contains("| foo         |"));
        assert!(output.contains("| bar         |"));
    }

    #[test]
    fn test_empty_registry() {
        let mut io = ConsoleIo::new(Vec::new());

        SeedListCommand.handle(&mut io, &Seeders::default()).unwrap();

        assert_eq!(String::from_utf8(io.into_inner()).unwrap().lines().count(), 4);
    }
}
