use std::io::{self, BufRead, Write};

use belegium::PreferenceTable;
use log::warn;

/// Ask for destinations offering more than one place until an empty name is entered or input runs out.
///
/// Unknown names, non-numbers and zero are reported on `output` and asked for again.
pub fn collect_capacities(table: &mut PreferenceTable, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    writeln!(output, "Destinations with more than one free place (leave the name empty when there are no more):")?;
    let mut lines = input.lines();

    loop {
        writeln!(output, "Name of the destination:")?;
        let Some(name) = lines.next().transpose()? else {
            break;
        };
        let name = name.trim();
        if name.is_empty() {
            break;
        }

        if !table.has_destination(name) {
            writeln!(output, "There is no destination named {name}")?;
            continue;
        }

        writeln!(output, "Number of free places:")?;
        let Some(count) = lines.next().transpose()? else {
            break;
        };
        let Ok(places) = count.trim().parse::<usize>() else {
            writeln!(output, "That is not a number")?;
            continue;
        };

        if let Err(e) = table.set_capacity(name, places) {
            warn!("rejected capacity for {name}: {e}");
            writeln!(output, "{e}")?;
        }
    }

    Ok(())
}
