use anyhow::Result;

use crate::context::AppContext;

pub fn show(ctx: &AppContext) -> Result<()> {
    println!("# {}", ctx.config_service.path().display());
    if let Ok(token_file) = ctx.paths.token_file() {
        println!("# session: {}", token_file.display());
    }
    print!("{}", toml::to_string_pretty(&ctx.config)?);
    Ok(())
}
