//! # Claw Rover Executable
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Create the session and initialise logging
//!     - Load parameters
//!     - Initialise the brick and the manual input source
//!     - Main loop (see `claw_lib::ctrl_loop`):
//!         - Colour sensing and mode selection
//!         - Manual or autonomous control
//!         - Tick pacing
//!     - Stop all motors once Ctrl-C is received
//!
//! The brick used is the simulated brick, configured by the `[sim]` table of the parameter file.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::info;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use structopt::StructOpt;

// Internal
use claw_lib::{
    brick::{sim::SimBrick, Brick, NotifyKind},
    ctrl_loop::CtrlLoop,
    input::StubInput,
    params::ClawExecParams,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Claw rover controller, runs until interrupted with Ctrl-C.
#[derive(Debug, StructOpt)]
#[structopt(name = "claw_exec")]
struct Opts {
    /// Parameter file, relative to `$CLAW_SW_ROOT/params`
    #[structopt(long, default_value = "claw_exec.toml")]
    params: String,

    /// Minimum log level, at least `info`
    #[structopt(long, default_value = "debug")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("claw_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opts.log_level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Claw Rover Executable\n");
    let uname = host::get_uname().wrap_err("Failed to get host information")?;
    info!(
        "Running on: {} ({} {} {})",
        uname.nodename, uname.sysname, uname.release, uname.machine
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: ClawExecParams =
        util::params::load(&opts.params).wrap_err("Could not load exec params")?;

    params
        .loop_params
        .validate()
        .wrap_err("Invalid control loop parameters")?;

    info!("Exec parameters loaded");
    info!("    {:?}", params.loop_params);

    // ---- INITIALISE BRICK ----

    let mut brick = SimBrick::new(&params.sim).wrap_err("Failed to initialise the SimBrick")?;
    info!(
        "SimBrick initialised with {} frames",
        params.sim.frames.len()
    );

    // ---- SIGNAL HANDLING ----

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })
    .wrap_err("Failed to set the Ctrl-C handler")?;

    // ---- MAIN LOOP ----

    brick.notify(NotifyKind::Startup);

    let mut ctrl = CtrlLoop::new(brick, StubInput, params.loop_params);

    info!("Initialisation complete, entering main loop\n");

    ctrl.run(&running).wrap_err("Control loop failed")?;

    // ---- SHUTDOWN ----

    info!("End of execution after {} ticks", ctrl.num_ticks());

    Ok(())
}
