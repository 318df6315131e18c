use anyhow::Result;
use vergen::EmitBuilder;

// Exposes VERGEN_GIT_SHA to the CLI's version banner
fn main() -> Result<()> {
    EmitBuilder::builder().git_sha(true).emit()?;
    Ok(())
}
