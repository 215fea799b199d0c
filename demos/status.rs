//! Prints the firmware versions and axis positions of a mount connected through its hand
//! controller.
//!
//! Usage: `cargo run --example status -- /dev/ttyUSB0 [-v]`
#[path = "_logging.rs"]
mod logging;

use auxstar::{HandController, Target};

fn main() -> Result<(), auxstar::Error> {
    logging::init("status", logging::verbosity());
    let port = std::env::args()
        .skip(1)
        .find(|a| !a.starts_with('-'))
        .unwrap_or_else(|| "/dev/ttyUSB0".to_owned());

    let mut controller = HandController::open(&port)?;
    let status = controller.status()?;
    println!("{status}");

    for target in [Target::Alt, Target::Azm] {
        log::info!(
            "{:?}: cordwrap enabled {}, approach {:?}",
            target,
            controller.poll_cordwrap(target)?,
            controller.get_approach(target)?
        );
    }
    controller.close()
}
