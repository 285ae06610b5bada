//! Attic binary entry point.
//!
//! Exit codes: 0 on success, 2 on setup or validation failures, 1 on
//! mid-run replay failures.

use attic::core::types::TypeError;
use attic::engine::MigrateError;
use attic::ui::output;

fn main() {
    if let Err(err) = attic::cli::run() {
        output::error(format!("{err:#}"));

        let code = if let Some(migrate) = err.downcast_ref::<MigrateError>() {
            migrate.exit_code()
        } else if err.downcast_ref::<TypeError>().is_some() {
            // Branch-name validation happens before the engine runs.
            2
        } else {
            1
        };
        std::process::exit(code);
    }
}
