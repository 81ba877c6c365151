#![allow(dead_code)]

use std::env;
use std::io::Error;

use clap::CommandFactory;
use clap_complete::{generate_to, Shell};

include!("src/opt/lsl.rs");

/// Shell completions for `lsl` land in `target/<profile>/completions`.
fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/opt/lsl.rs");
    let Some(outdir) = env::var_os("OUT_DIR") else {
        return Ok(());
    };

    let Some(comp_dir) = PathBuf::from(outdir)
        .ancestors()
        .nth(3)
        .map(|p| p.join("completions"))
    else {
        return Ok(());
    };
    std::fs::create_dir_all(&comp_dir)?;

    let mut cmd = LslClientParser::command();
    for shell in [Shell::Bash, Shell::Fish, Shell::Zsh] {
        generate_to(shell, &mut cmd, "lsl", &comp_dir)?;
    }
    Ok(())
}
