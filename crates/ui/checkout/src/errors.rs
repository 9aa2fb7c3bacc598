use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use color_eyre::Result;
use tracing::error;

static INIT: OnceLock<()> = OnceLock::new();

/// Install the eyre and panic hooks. Calling this again is a no-op.
///
/// `log_file` is named in every report so a donor reporting a crash can
/// attach the run's log.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(panic_section(log_file))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    let log_file: Option<PathBuf> = log_file.map(Path::to_path_buf);
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = crate::tui::restore() {
            error!("Unable to restore terminal: {e:?}");
        }

        let report = panic_hook.panic_report(panic_info).to_string();
        error!(log = ?log_file, "panic: {}", strip_ansi_escapes::strip_str(&report));

        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, metadata, print_msg};
            let metadata = metadata!();
            let dump = handle_dump(&metadata, panic_info);
            if print_msg(dump, &metadata).is_err() {
                eprintln!("{report}");
            }
        }

        #[cfg(debug_assertions)]
        {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(libc::EXIT_FAILURE);
    }));

    let _ = INIT.set(());
    Ok(())
}

fn panic_section(log_file: Option<&Path>) -> String {
    match log_file {
        Some(path) => format!(
            "This is a bug in checkout {}. The log of this run is at {}",
            env!("CARGO_PKG_VERSION"),
            path.display()
        ),
        None => format!("This is a bug in checkout {}.", env!("CARGO_PKG_VERSION")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_section_names_the_log() {
        let text = panic_section(Some(Path::new("/tmp/checkout.log")));
        assert!(text.contains("/tmp/checkout.log"));
        assert!(!panic_section(None).contains("log"));
    }
}
