//! Thin wrapper over `camparl_api::serve` so the same startup path is
//! reachable as `camparl serve` or as the standalone `camparl-api` binary.

use color_eyre::eyre::Result;

pub async fn run() -> Result<()> {
    camparl_api::serve().await
}
