use std::io::{self, Write};

use serde_json::Value;
use tracing::{error, info, warn};

use super::ConsoleIo;
use crate::error::SeedingResult;
use crate::registry::Seeders;
use crate::seeder::{ItemSink, Seeder};

/// `seed`: runs the named seeders, or all of them in registration order.
///
/// Unknown names and failing runs are reported and skipped. A seeder that
/// cannot be constructed aborts the command with [`SeedingError::Resolve`].
///
/// [`SeedingError::Resolve`]: crate::error::SeedingError::Resolve
#[derive(Debug, Clone, Default)]
pub struct SeedCommand {
    pub names: Vec<String>,
}

impl SeedCommand {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub async fn handle<W: Write + Send>(
        &self,
        io: &mut ConsoleIo<W>,
        seeders: &mut Seeders,
    ) -> SeedingResult<i32> {
        let names = if self.names.is_empty() {
            seeders.names()
        } else {
            self.names.clone()
        };

        for name in &names {
            if !seeders.has_seeder(name) {
                warn!("Seeder {name} not found");
                io.error(&format!("Seeder {name} not found"))?;
                continue;
            }

            let seeder = seeders.get_seeder(name)?;

            info!("Seeder {name} starting");
            io.info(&format!("Seeder {name} starting"))?;

            match run_seeder(io, seeder.as_ref()).await? {
                Ok(count) => {
                    info!("Seeder {name} finished ({count} items)");
                    io.info(&format!("Seeder {name} finished"))?;
                }
                Err(e) => {
                    error!("Seeder {name} failed: {e}");
                    io.error(&format!("Seeder {name} failed: {e}"))?;
                }
            }
        }

        Ok(0)
    }
}

/// Writes each item as pretty JSON when the console is verbose.
struct ConsoleSink<'a, W> {
    io: &'a mut ConsoleIo<W>,
    error: Option<io::Error>,
}

impl<W: Write + Send> ItemSink for ConsoleSink<'_, W> {
    fn accept(&mut self, item: Value) {
        if self.error.is_some() || !self.io.is_verbose() {
            return;
        }

        let result = serde_json::to_string_pretty(&item)
            .map_err(io::Error::from)
            .and_then(|json| self.io.write(&json))
            .and_then(|()| self.io.new_line());

        if let Err(e) = result {
            self.error = Some(e);
        }
    }
}

/// Outer error: console output failed. Inner error: the seeder failed.
async fn run_seeder<W: Write + Send>(
    io: &mut ConsoleIo<W>,
    seeder: &dyn Seeder,
) -> SeedingResult<SeedingResult<usize>> {
    let mut sink = ConsoleSink { io, error: None };
    let result = seeder.run(&mut sink).await;

    if let Some(e) = sink.error {
        return Err(e.into());
    }
    Ok(result)
}
