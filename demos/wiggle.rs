//! Slews both axes at the fastest fixed rate for three seconds, then stops them and prints
//! where they ended up.
//!
//! Usage: `cargo run --example wiggle -- /dev/ttyUSB0 [-v]`
#[path = "_logging.rs"]
mod logging;

use std::time::Duration;

use auxstar::rate::Axis;
use auxstar::{HandController, Target};

fn main() -> Result<(), auxstar::Error> {
    logging::init("wiggle", logging::verbosity());
    let port = std::env::args()
        .skip(1)
        .find(|a| !a.starts_with('-'))
        .unwrap_or_else(|| "/dev/ttyUSB0".to_owned());

    let mut controller = HandController::open(&port)?;
    println!("{}", controller.status()?);

    log::info!("Slewing...");
    controller.slew_fixed(Target::Alt, 9)?;
    controller.slew_fixed(Target::Azm, 9)?;
    std::thread::sleep(Duration::from_secs(3));

    log::info!("Stopping...");
    // always try to stop both axes, even if the first stop fails
    let alt = controller.stop(Target::Alt);
    if alt.is_err() {
        controller.reset()?;
    }
    controller.stop(Target::Azm)?;
    alt?;

    println!("{}", controller.status()?);
    log::info!(
        "last known: alt {:?}, azm {:?}",
        controller.last_position(Axis::Altitude),
        controller.last_position(Axis::Azimuth)
    );
    controller.close()
}
