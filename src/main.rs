/*!
 * memsim - Interactive Memory Management Simulator
 *
 * Reads whitespace-delimited commands from stdin and dispatches them to the
 * simulation engines. See the `shell` module for the command set.
 */

use log::info;
use memsim::shell::{Shell, PROMPT};
use std::io::{self, BufRead, Write};

fn main() -> io::Result<()> {
    env_logger::init();
    info!("memsim starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut shell = Shell::new();

    write!(out, "{PROMPT}")?;
    out.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        match shell.execute(&line) {
            Some(output) => {
                if !output.is_empty() {
                    writeln!(out, "{output}")?;
                }
            }
            None => break,
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }

    info!("memsim exiting");
    Ok(())
}
