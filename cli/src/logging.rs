use log::LevelFilter;
use std::io;

/// Initialize logging with the fern logger: a debug-level feed for this
/// binary and `blockplan` to stderr and `/tmp/blockplan.log`, and (if the
/// home directory exists) a copy beside the user's Desktop.
pub fn init() -> Result<(), fern::InitError> {
    let mut logger = fern::Dispatch::new()
        .level(LevelFilter::Off)
        .level_for("blockplan", LevelFilter::Debug)
        .level_for("blockplan_cli", LevelFilter::Debug)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {}: {}",
                record.level(),
                {
                    let target = record.target();
                    target.find(':').map_or(target, |pos| &target[..pos])
                },
                message
            ))
        })
        .chain(io::stderr());

    match fern::log_file("/tmp/blockplan.log") {
        Ok(log) => logger = logger.chain(log),
        Err(why) => eprintln!("failed to create log file at /tmp/blockplan.log: {}", why),
    }

    if let Some(home) = dirs::home_dir() {
        let desktop = home.join("Desktop");
        let log = if desktop.is_dir() {
            fern::log_file(desktop.join("blockplan.log"))
        } else {
            fern::log_file(home.join("blockplan.log"))
        };

        match log {
            Ok(log) => logger = logger.chain(log),
            Err(why) => eprintln!("failed to set up logging for the home directory: {}", why),
        }
    }

    logger.apply()
}
