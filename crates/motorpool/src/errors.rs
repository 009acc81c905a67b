//! Panic and error-report hooks.
//!
//! A panic while the UI is active would otherwise leave the terminal in raw
//! mode on the alternate screen, taking the report down with it. The hook
//! installed here restores the terminal before anything is printed, mirrors
//! the report into the tracing log (stdout belongs to the UI, so the log
//! file is where diagnostics survive), and then reports to the user: a
//! human-panic crash dump in release builds, a full better-panic backtrace
//! in debug builds.

use color_eyre::{config::HookBuilder, Result};

use crate::tui::Tui;

/// Install the eyre and panic hooks. Call once from `main`, before the
/// terminal enters raw mode.
pub fn init() -> Result<()> {
    let (panic_hook, eyre_hook) = HookBuilder::default()
        .panic_section("The terminal has been restored; the full report is in the log file.")
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(err) = Tui::restore() {
            tracing::error!("failed to restore terminal: {err:?}");
        }

        // Log first; once the process exits, the log file is the only place
        // the report survives.
        let report = panic_hook.panic_report(panic_info).to_string();
        tracing::error!("{}", strip_ansi_escapes::strip_str(&report));

        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, metadata, print_msg};
            let meta = metadata!();
            let dump = handle_dump(&meta, panic_info);
            if print_msg(dump, &meta).is_err() {
                eprintln!("{report}");
            }
        }

        #[cfg(debug_assertions)]
        better_panic::Settings::auto()
            .most_recent_first(false)
            .lineno_suffix(true)
            .verbosity(better_panic::Verbosity::Full)
            .create_panic_handler()(panic_info);

        std::process::exit(libc::EXIT_FAILURE);
    }));
    Ok(())
}
