//! slovar CLI entry point.

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    slovar::cli::run()
}
