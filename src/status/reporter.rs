/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::io::{self, Write};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::StatusFormat;
use crate::shared::BuildingSnapshot;

const SEPARATOR: &str = "------------------------------------";

/**
 * Writes building snapshots to an output stream.
 *
 * Text reports draw one row per floor from the top: the floor number, an `X`
 * for every elevator standing there (`-` otherwise), then the targets of the
 * passengers waiting to go down and up. Below the floors each elevator's
 * direction and route are listed.
 *
 * ```text
 * 2: -X [] [3]
 * 1: X- [0] []
 * 0: -- [] []
 * Lifts state:
 * 0 down: [0]
 * 1 idle: []
 * ------------------------------------
 * ```
 *
 * JSON reports are one serialized `BuildingSnapshot` per line.
 */
pub struct StatusReporter<W> {
    format: StatusFormat,
    output: W,
}

impl<W: Write> StatusReporter<W> {
    pub fn new(format: StatusFormat, output: W) -> StatusReporter<W> {
        StatusReporter { format, output }
    }

    pub fn report(&mut self, snapshot: &BuildingSnapshot) -> io::Result<()> {
        match self.format {
            StatusFormat::Text => self.write_text(snapshot)?,
            StatusFormat::Json => {
                serde_json::to_writer(&mut self.output, snapshot)?;
                writeln!(self.output)?;
            }
        }
        self.output.flush()
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn write_text(&mut self, snapshot: &BuildingSnapshot) -> io::Result<()> {
        for floor in &snapshot.floors {
            let shafts: String = snapshot
                .elevators
                .iter()
                .map(|elevator| {
                    if floor.elevators.contains(&elevator.id) {
                        'X'
                    } else {
                        '-'
                    }
                })
                .collect();
            writeln!(
                self.output,
                "{}: {} {} {}",
                floor.floor,
                shafts,
                list(&floor.down),
                list(&floor.up)
            )?;
        }

        writeln!(self.output, "Lifts state:")?;
        for elevator in &snapshot.elevators {
            writeln!(
                self.output,
                "{} {}: {}",
                elevator.id,
                elevator.direction,
                list(&elevator.route)
            )?;
        }
        writeln!(self.output, "{}", SEPARATOR)
    }
}

fn list<'a>(floors: impl IntoIterator<Item = &'a u8>) -> String {
    let items: Vec<String> = floors.into_iter().map(|floor| floor.to_string()).collect();
    format!("[{}]", items.join(", "))
}
